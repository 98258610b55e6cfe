use std::io::{BufRead, Lines};

use it_core::error::CoreError;
use it_core::tables::RawPair;

/// Parse une ligne d'index `<index décimal> 0x<code point hex> [texte]`.
///
/// Blank lines and `#` comments yield `Ok(None)`. Anything after the code
/// point (WHATWG files append the glyph and its name) is ignored.
///
/// # Errors
/// Returns `CoreError::Parse` if a record line is malformed.
///
/// # Example
/// ```
/// use it_source::parse_line;
/// let pair = parse_line("  942\t0x4E00\t一 (<CJK Ideograph>)", 7).unwrap().unwrap();
/// assert_eq!((pair.index, pair.codepoint), (942, 0x4E00));
/// assert!(parse_line("# comment", 1).unwrap().is_none());
/// assert!(parse_line("942 4E00", 9).is_err());
/// ```
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<RawPair>, CoreError> {
    let s = line.trim();
    if s.is_empty() || s.starts_with('#') {
        return Ok(None);
    }

    let malformed = || CoreError::Parse {
        line: line_no,
        text: s.to_string(),
    };

    let mut fields = s.split_whitespace();
    // `u32` parsing tolerates a leading `+`: only bare digits are records.
    let index = fields
        .next()
        .filter(|f| f.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|f| f.parse::<u32>().ok())
        .ok_or_else(malformed)?;
    let codepoint = fields
        .next()
        .and_then(|f| f.strip_prefix("0x").or_else(|| f.strip_prefix("0X")))
        .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .ok_or_else(malformed)?;

    Ok(Some(RawPair::new(index, codepoint)))
}

/// Itérateur paresseux de `RawPair` sur un flux d'index.
///
/// Yields one item per record line; comments and blank lines are skipped.
/// Line numbers in errors are 1-based.
///
/// # Example
/// ```
/// use it_source::IndexLines;
/// let text = "# Big5\n\n0 0x43F0\n1 0x4C32\n";
/// let pairs: Result<Vec<_>, _> = IndexLines::new(text.as_bytes()).collect();
/// assert_eq!(pairs.unwrap().len(), 2);
/// ```
pub struct IndexLines<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> IndexLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Nombre de lignes lues jusqu'ici (commentaires inclus).
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for IndexLines<R> {
    type Item = Result<RawPair, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(CoreError::Io(e))),
            };
            self.line_no += 1;
            match parse_line(&line, self.line_no) {
                Ok(Some(pair)) => return Some(Ok(pair)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
