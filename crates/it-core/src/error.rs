use thiserror::Error;

/// Errors originating from the core module.
///
/// Every variant is fatal for a compilation run: no partial table is emitted.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An ingested index falls outside the encoding's code space.
    #[error("Index {index} hors de l'espace de code [0, {size})")]
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Code-space size `N`.
        size: u32,
    },

    /// A code point does not fit in the reverse table.
    #[error("Code point U+{codepoint:04X} hors de la table inverse [0, {size:#X})")]
    CodePointOutOfRange {
        /// Offending code point.
        codepoint: u32,
        /// Reverse table size.
        size: u32,
    },

    /// Malformed index record.
    #[error("Ligne {line} illisible : {text:?}")]
    Parse {
        /// 1-based line number in the source.
        line: usize,
        /// The trimmed line content.
        text: String,
    },

    /// Underlying read failure while scanning the index source.
    #[error("Erreur de lecture : {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Unsupported output format.
    #[error("Format non supporté : {format}")]
    UnsupportedFormat {
        /// The format string that is unsupported.
        format: String,
    },
}
