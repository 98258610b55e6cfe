use serde::{Deserialize, Serialize};

/// Dense decode accumulator: `forward[index] = codepoint`, 0 = hole.
pub type ForwardTable = Vec<u32>;

/// Dense encode accumulator: `reverse[codepoint] = packed byte pair`, 0 = hole.
pub type ReverseTable = Vec<u16>;

/// One `(index, codepoint)` record from an index file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawPair {
    /// Linear position in the encoded code space.
    pub index: u32,
    /// Unicode scalar value the index decodes to.
    pub codepoint: u32,
}

impl RawPair {
    /// Builds a pair; no range check happens before ingestion.
    #[must_use]
    pub fn new(index: u32, codepoint: u32) -> Self {
        Self { index, codepoint }
    }
}

/// Half-open interval `[low, high)` over the reverse table.
///
/// # Example
/// ```
/// use it_core::tables::Interval;
/// let iv = Interval { low: 10, high: 14 };
/// assert_eq!(iv.len(), 4);
/// assert!(iv.contains(13));
/// assert!(!iv.contains(14));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Interval {
    /// First covered code point.
    pub low: u32,
    /// One past the last covered code point.
    pub high: u32,
}

impl Interval {
    #[inline]
    #[must_use]
    pub fn len(&self) -> u32 {
        self.high - self.low
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.high <= self.low
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        (self.low..self.high).contains(&value)
    }
}

/// Encode sub-table for one interval, stored sparse.
///
/// `entries` lists `(offset, packed)` for non-hole slots only, sorted by
/// offset. Any offset not listed is unmapped.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EncodeTable {
    /// Code point at offset 0.
    pub low: u32,
    /// One past the last code point the table covers.
    pub high: u32,
    /// `(codepoint - low, packed byte pair)`, ascending offsets.
    pub entries: Vec<(u32, u16)>,
}

impl EncodeTable {
    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval {
            low: self.low,
            high: self.high,
        }
    }

    /// Number of slots, holes included.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.high - self.low
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.high <= self.low
    }

    /// Looks up a code point. `None` outside the interval or on a hole.
    ///
    /// # Example
    /// ```
    /// use it_core::tables::EncodeTable;
    /// let t = EncodeTable { low: 100, high: 104, entries: vec![(0, 0xA140), (3, 0xA141)] };
    /// assert_eq!(t.get(103), Some(0xA141));
    /// assert_eq!(t.get(101), None);
    /// assert_eq!(t.get(104), None);
    /// ```
    #[must_use]
    pub fn get(&self, codepoint: u32) -> Option<u16> {
        if !self.interval().contains(codepoint) {
            return None;
        }
        let offset = codepoint - self.low;
        self.entries
            .binary_search_by_key(&offset, |&(o, _)| o)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Expands to the positional table a consumer indexes with `cp - low`.
    #[must_use]
    pub fn to_dense(&self) -> Vec<u16> {
        let mut dense = vec![0u16; self.len() as usize];
        for &(offset, value) in &self.entries {
            dense[offset as usize] = value;
        }
        dense
    }
}

/// Output of the table compiler: one decode table and the encode sub-tables,
/// sorted by decreasing interval length.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompiledTableSet {
    /// Layout name the tables were built for.
    pub name: String,
    /// Positional size of the decode table (code-space size `N`).
    pub decode_len: u32,
    /// Sparse decode table, `(index, codepoint)` sorted by index.
    pub decode: Vec<(u32, u32)>,
    /// Encode sub-tables, largest interval first.
    pub encode: Vec<EncodeTable>,
}

impl CompiledTableSet {
    #[must_use]
    pub fn num_encode_tables(&self) -> usize {
        self.encode.len()
    }

    /// Decodes an index. `None` for holes and out-of-range indices.
    #[must_use]
    pub fn decode(&self, index: u32) -> Option<u32> {
        self.decode
            .binary_search_by_key(&index, |&(i, _)| i)
            .ok()
            .map(|i| self.decode[i].1)
    }

    /// Encodes a code point by testing each table's range in order.
    #[must_use]
    pub fn encode(&self, codepoint: u32) -> Option<u16> {
        self.encode
            .iter()
            .find(|t| t.interval().contains(codepoint))
            .and_then(|t| t.get(codepoint))
    }

    /// Positional decode table, holes filled with 0.
    #[must_use]
    pub fn decode_dense(&self) -> Vec<u32> {
        let mut dense = vec![0u32; self.decode_len as usize];
        for &(index, codepoint) in &self.decode {
            dense[index as usize] = codepoint;
        }
        dense
    }

    /// One line per encode table: entry count and covered rune range.
    ///
    /// # Example
    /// ```
    /// use it_core::tables::{CompiledTableSet, EncodeTable};
    /// let set = CompiledTableSet {
    ///     name: "big5".into(),
    ///     decode_len: 4,
    ///     decode: vec![],
    ///     encode: vec![EncodeTable { low: 167, high: 168, entries: vec![(0, 0xA1B1)] }],
    /// };
    /// assert_eq!(set.summary()[0], "encode0:     1 entries for runes in [   167,    168).");
    /// ```
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        self.encode
            .iter()
            .enumerate()
            .map(|(i, t)| {
                format!(
                    "encode{i}: {:5} entries for runes in [{:6}, {:6}).",
                    t.len(),
                    t.low,
                    t.high
                )
            })
            .collect()
    }
}
