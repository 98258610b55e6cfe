use it_core::error::CoreError;
use it_core::layout::CodeLayout;
use it_core::tables::{ForwardTable, RawPair, ReverseTable};

/// Compteurs d'ingestion, pour les logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Paires acceptées.
    pub pairs: usize,
    /// Index already mapped when seen again.
    pub duplicate_indices: usize,
    /// Code points already mapped from another index (last one wins).
    pub duplicate_codepoints: usize,
}

/// Accumulateur dense forward/reverse.
///
/// Both tables are plain owned buffers with a single writer. Every write is
/// an unconditional overwrite, so for a code point reached from several
/// indices the reverse table keeps the **last** one. This matches
/// `iconv -f UTF-8 -t BIG5`: U+8005 appears at indices 2148 (0x8ECD) and
/// 6543 (0xAACC) in index-big5.txt and iconv encodes it as 0xAACC.
///
/// # Example
/// ```
/// use it_compile::MappingIngestor;
/// use it_core::{CodeLayout, RawPair};
///
/// let mut ingestor = MappingIngestor::new(CodeLayout::big5(), 0x10000);
/// ingestor.ingest(RawPair::new(2148, 0x8005)).unwrap();
/// ingestor.ingest(RawPair::new(6543, 0x8005)).unwrap();
/// let (forward, reverse) = ingestor.finish();
/// assert_eq!(forward[2148], 0x8005);
/// assert_eq!(reverse[0x8005], 0xAACC);
/// ```
pub struct MappingIngestor {
    layout: CodeLayout,
    forward: ForwardTable,
    reverse: ReverseTable,
    stats: IngestStats,
}

impl MappingIngestor {
    /// Alloue les deux tables : `N` slots forward, `reverse_size` slots reverse.
    #[must_use]
    pub fn new(layout: CodeLayout, reverse_size: u32) -> Self {
        let forward = vec![0u32; layout.size() as usize];
        let reverse = vec![0u16; reverse_size as usize];
        Self {
            layout,
            forward,
            reverse,
            stats: IngestStats::default(),
        }
    }

    /// Ajoute une paire aux deux tables.
    ///
    /// # Errors
    /// `IndexOutOfRange` if the index is outside `[0, N)`,
    /// `CodePointOutOfRange` if the code point exceeds the reverse table.
    /// Neither table is modified on error.
    pub fn ingest(&mut self, pair: RawPair) -> Result<(), CoreError> {
        let RawPair { index, codepoint } = pair;
        let size = self.layout.size();
        if index >= size {
            return Err(CoreError::IndexOutOfRange { index, size });
        }
        let reverse_size = self.reverse.len() as u32;
        if codepoint >= reverse_size {
            return Err(CoreError::CodePointOutOfRange {
                codepoint,
                size: reverse_size,
            });
        }

        let packed = self.layout.pack(index);
        let slot = &mut self.reverse[codepoint as usize];
        if *slot != 0 {
            self.stats.duplicate_codepoints += 1;
            log::debug!("U+{codepoint:04X} : {:#06X} remplacé par {packed:#06X}", *slot);
        }
        *slot = packed;

        let forward = &mut self.forward[index as usize];
        if *forward != 0 {
            self.stats.duplicate_indices += 1;
            log::debug!("Index {index} redéfini : U+{:04X} -> U+{codepoint:04X}", *forward);
        }
        *forward = codepoint;

        self.stats.pairs += 1;
        Ok(())
    }

    /// Ingère toute une séquence, en s'arrêtant à la première erreur.
    ///
    /// # Errors
    /// Propagates the first parse or range error; the tables are then
    /// incomplete and must be discarded.
    pub fn ingest_all<I>(&mut self, pairs: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = Result<RawPair, CoreError>>,
    {
        for pair in pairs {
            self.ingest(pair?)?;
        }
        log::info!(
            "{} paires ingérées ({} code points en double, {} index en double)",
            self.stats.pairs,
            self.stats.duplicate_codepoints,
            self.stats.duplicate_indices
        );
        Ok(())
    }

    #[must_use]
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    #[must_use]
    pub fn layout(&self) -> &CodeLayout {
        &self.layout
    }

    /// Rend les tables forward et reverse remplies.
    #[must_use]
    pub fn finish(self) -> (ForwardTable, ReverseTable) {
        (self.forward, self.reverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big5() -> MappingIngestor {
        MappingIngestor::new(CodeLayout::big5(), 0x4_0000)
    }

    #[test]
    fn tables_have_configured_sizes() {
        let (forward, reverse) = big5().finish();
        assert_eq!(forward.len(), 19_782);
        assert_eq!(reverse.len(), 0x4_0000);
        assert!(forward.iter().all(|&v| v == 0));
        assert!(reverse.iter().all(|&v| v == 0));
    }

    #[test]
    fn last_write_wins_on_duplicate_codepoint() {
        let mut ingestor = big5();
        ingestor.ingest(RawPair::new(5000, 0x8005)).unwrap();
        ingestor.ingest(RawPair::new(1000, 0x8005)).unwrap();
        assert_eq!(ingestor.stats().duplicate_codepoints, 1);
        let layout = ingestor.layout().clone();
        let (forward, reverse) = ingestor.finish();
        assert_eq!(reverse[0x8005], layout.pack(1000));
        assert_ne!(reverse[0x8005], layout.pack(5000));
        // Both indices still decode.
        assert_eq!(forward[5000], 0x8005);
        assert_eq!(forward[1000], 0x8005);
    }

    #[test]
    fn duplicate_index_overwrites_forward() {
        let mut ingestor = big5();
        ingestor.ingest(RawPair::new(7, 0x4E00)).unwrap();
        ingestor.ingest(RawPair::new(7, 0x4E01)).unwrap();
        assert_eq!(ingestor.stats().duplicate_indices, 1);
        let (forward, reverse) = ingestor.finish();
        assert_eq!(forward[7], 0x4E01);
        // The stale reverse entry is kept: it still names a valid byte pair.
        assert_eq!(reverse[0x4E00], reverse[0x4E01]);
    }

    #[test]
    fn index_out_of_range_is_fatal() {
        let mut ingestor = big5();
        let err = ingestor.ingest(RawPair::new(19_782, 0x4E00)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::IndexOutOfRange {
                index: 19_782,
                size: 19_782
            }
        ));
        let (_, reverse) = ingestor.finish();
        assert_eq!(reverse[0x4E00], 0);
    }

    #[test]
    fn codepoint_out_of_range_is_fatal() {
        let mut ingestor = MappingIngestor::new(CodeLayout::big5(), 0x1_0000);
        let err = ingestor.ingest(RawPair::new(3, 0x2_0547)).unwrap_err();
        assert!(matches!(err, CoreError::CodePointOutOfRange { codepoint: 0x2_0547, .. }));
        let (forward, _) = ingestor.finish();
        assert_eq!(forward[3], 0);
    }

    #[test]
    fn ingest_all_stops_at_first_error() {
        let mut ingestor = big5();
        let pairs = vec![
            Ok(RawPair::new(0, 0x4E00)),
            Err(CoreError::Parse {
                line: 2,
                text: "oops".into(),
            }),
            Ok(RawPair::new(1, 0x4E01)),
        ];
        assert!(matches!(
            ingestor.ingest_all(pairs),
            Err(CoreError::Parse { line: 2, .. })
        ));
        assert_eq!(ingestor.stats().pairs, 1);
    }
}
