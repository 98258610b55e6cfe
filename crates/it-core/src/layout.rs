use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Geometry of a two-byte encoding's code space.
///
/// A linear index `x` splits into `row = x / row_width` and
/// `col = x % row_width`. The lead byte is `lead_base + row`. The trail byte
/// is `col + trail_low_base` below `trail_split` and `col + trail_high_base`
/// from `trail_split` on, which skips the reserved trail sub-range.
///
/// # Example
/// ```
/// use it_core::layout::CodeLayout;
/// let big5 = CodeLayout::big5();
/// assert_eq!(big5.size(), 19_782);
/// assert_eq!(big5.pack(0), 0x8140);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CodeLayout {
    /// Preset name, used in generated headers.
    pub name: String,
    /// Number of lead bytes.
    pub rows: u32,
    /// Number of trail bytes per lead byte.
    pub row_width: u32,
    /// First lead byte.
    pub lead_base: u32,
    /// Column at which trail bytes jump over the reserved range.
    pub trail_split: u32,
    /// Offset added to columns below `trail_split`.
    pub trail_low_base: u32,
    /// Offset added to columns at or above `trail_split`.
    pub trail_high_base: u32,
}

impl Default for CodeLayout {
    fn default() -> Self {
        Self::big5()
    }
}

impl CodeLayout {
    /// Big5 (WHATWG): leads 0x81..=0xFE, trails 0x40..=0x7E then 0xA1..=0xFE.
    #[must_use]
    pub fn big5() -> Self {
        Self {
            name: "big5".into(),
            rows: 126,
            row_width: 157,
            lead_base: 0x81,
            trail_split: 0x3F,
            trail_low_base: 0x40,
            trail_high_base: 0x62,
        }
    }

    /// Code-space size `N = rows × row_width`.
    #[inline]
    #[must_use]
    pub fn size(&self) -> u32 {
        self.rows * self.row_width
    }

    /// Packs a linear index into its `(lead << 8) | trail` byte pair.
    ///
    /// The caller guarantees `index < self.size()`.
    ///
    /// # Example
    /// ```
    /// use it_core::layout::CodeLayout;
    /// let big5 = CodeLayout::big5();
    /// // U+8005 occurs at index 6543 in index-big5.txt.
    /// assert_eq!(big5.pack(6543), 0xAACC);
    /// ```
    #[inline]
    #[must_use]
    pub fn pack(&self, index: u32) -> u16 {
        debug_assert!(index < self.size(), "index out of code space");
        let row = index / self.row_width;
        let col = index % self.row_width;
        let trail = if col < self.trail_split {
            col + self.trail_low_base
        } else {
            col + self.trail_high_base
        };
        (((self.lead_base + row) << 8) | trail) as u16
    }

    /// Checks that every packed pair fits in two non-zero bytes.
    ///
    /// # Errors
    /// Returns `CoreError::Config` describing the first violated bound.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.rows == 0 || self.row_width == 0 {
            return Err(CoreError::Config(format!(
                "layout {} : rows et row_width doivent être > 0",
                self.name
            )));
        }
        if self.lead_base == 0 || self.lead_base.saturating_add(self.rows - 1) > 0xFF {
            return Err(CoreError::Config(format!(
                "layout {} : octets de tête {:#X}+{} hors de [0x01, 0xFF]",
                self.name, self.lead_base, self.rows
            )));
        }
        if self.trail_split > self.row_width {
            return Err(CoreError::Config(format!(
                "layout {} : trail_split {} > row_width {}",
                self.name, self.trail_split, self.row_width
            )));
        }
        if self.trail_split > 0 && self.trail_low_base.saturating_add(self.trail_split - 1) > 0xFF {
            return Err(CoreError::Config(format!(
                "layout {} : octets de queue bas au-delà de 0xFF",
                self.name
            )));
        }
        if self.trail_split < self.row_width && self.trail_high_base.saturating_add(self.row_width - 1) > 0xFF {
            return Err(CoreError::Config(format!(
                "layout {} : octets de queue hauts au-delà de 0xFF",
                self.name
            )));
        }
        Ok(())
    }
}
