use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::layout::CodeLayout;

/// URL de l'index Big5 publié par le WHATWG.
pub const DEFAULT_INDEX_URL: &str = "https://encoding.spec.whatwg.org/index-big5.txt";

/// Taille par défaut de la table inverse : plans Unicode 0 à 3.
pub const DEFAULT_REVERSE_SIZE: u32 = 65536 * 4;

/// Any run of at least this many consecutive holes in the reverse table
/// starts a separate encode table.
pub const DEFAULT_SEPARATION: u32 = 1024;

/// Configuration complète d'une compilation de tables.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine (Big5).
///
/// # Example
/// ```
/// use it_core::config::CompilerConfig;
/// let config = CompilerConfig::default();
/// assert_eq!(config.separation, 1024);
/// assert_eq!(config.layout.size(), 126 * 157);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CompilerConfig {
    // === Source ===
    /// URL fetched when no local input is given.
    pub url: String,
    /// Local index file. `-` reads stdin. Takes priority over `url`.
    pub input: Option<PathBuf>,

    // === Layout ===
    /// Geometry of the encoded code space.
    pub layout: CodeLayout,
    /// Number of code points the reverse table covers.
    pub reverse_size: u32,

    // === Compilation ===
    /// Gap-tolerance threshold between encode tables.
    pub separation: u32,

    // === Sortie ===
    /// Format d'émission.
    pub format: OutputFormat,
    /// Fichier de sortie. `None` = stdout.
    pub output: Option<PathBuf>,
    /// Doc comment placed at the top of generated Rust sources.
    pub module_doc: Option<String>,
}

/// Output format of the emitted tables.
///
/// # Example
/// ```
/// use it_core::config::OutputFormat;
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
/// assert!("yaml".parse::<OutputFormat>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rust source with `static` tables.
    #[default]
    Rust,
    /// Pretty JSON snapshot of the compiled set.
    Json,
    /// bincode snapshot of the compiled set.
    Bincode,
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "json" => Ok(Self::Json),
            "bincode" | "bin" => Ok(Self::Bincode),
            _ => Err(CoreError::UnsupportedFormat { format: s.into() }),
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INDEX_URL.to_string(),
            input: None,
            layout: CodeLayout::big5(),
            reverse_size: DEFAULT_REVERSE_SIZE,
            separation: DEFAULT_SEPARATION,
            format: OutputFormat::Rust,
            output: None,
            module_doc: None,
        }
    }
}

impl CompilerConfig {
    /// Rejects configurations that would produce wrong or unusable tables.
    ///
    /// # Errors
    /// Returns `CoreError::Config` on the first invalid value.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.layout.validate()?;
        if self.separation == 0 {
            return Err(CoreError::Config("separation doit être >= 1".into()));
        }
        if self.reverse_size == 0 || self.reverse_size > 0x11_0000 {
            return Err(CoreError::Config(format!(
                "reverse_size {:#X} hors de [1, 0x110000]",
                self.reverse_size
            )));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    source: Option<SourceSection>,
    layout: Option<LayoutSection>,
    compile: Option<CompileSection>,
    output: Option<OutputSection>,
}

#[derive(Deserialize)]
struct SourceSection {
    url: Option<String>,
    input: Option<PathBuf>,
}

/// Layout section, all fields optional for partial override of the Big5 preset.
#[derive(Deserialize)]
struct LayoutSection {
    name: Option<String>,
    rows: Option<u32>,
    row_width: Option<u32>,
    lead_base: Option<u32>,
    trail_split: Option<u32>,
    trail_low_base: Option<u32>,
    trail_high_base: Option<u32>,
    reverse_size: Option<u32>,
}

#[derive(Deserialize)]
struct CompileSection {
    separation: Option<u32>,
}

#[derive(Deserialize)]
struct OutputSection {
    format: Option<OutputFormat>,
    path: Option<PathBuf>,
    module_doc: Option<String>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or fails validation.
///
/// # Example
/// ```no_run
/// use it_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/big5.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<CompilerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration rejetée : {}", path.display()))
}

/// Parses TOML text and merges it over `CompilerConfig::default()`.
///
/// # Errors
/// Returns an error on TOML syntax errors or invalid values.
///
/// # Example
/// ```
/// use it_core::config::parse_config;
/// let config = parse_config("[compile]\nseparation = 64\n").unwrap();
/// assert_eq!(config.separation, 64);
/// assert_eq!(config.layout.row_width, 157);
/// ```
pub fn parse_config(content: &str) -> Result<CompilerConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = CompilerConfig::default();

    if let Some(s) = file.source {
        if let Some(v) = s.url {
            config.url = v;
        }
        if let Some(v) = s.input {
            config.input = Some(v);
        }
    }

    if let Some(l) = file.layout {
        if let Some(v) = l.name {
            config.layout.name = v;
        }
        if let Some(v) = l.rows {
            config.layout.rows = v;
        }
        if let Some(v) = l.row_width {
            config.layout.row_width = v;
        }
        if let Some(v) = l.lead_base {
            config.layout.lead_base = v;
        }
        if let Some(v) = l.trail_split {
            config.layout.trail_split = v;
        }
        if let Some(v) = l.trail_low_base {
            config.layout.trail_low_base = v;
        }
        if let Some(v) = l.trail_high_base {
            config.layout.trail_high_base = v;
        }
        if let Some(v) = l.reverse_size {
            config.reverse_size = v;
        }
    }

    if let Some(c) = file.compile {
        if let Some(v) = c.separation {
            config.separation = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.format {
            config.format = v;
        }
        if let Some(v) = o.path {
            config.output = Some(v);
        }
        if let Some(v) = o.module_doc {
            config.module_doc = Some(v);
        }
    }

    config.validate()?;
    log::debug!(
        "Config : layout {} (N = {}), separation {}, reverse_size {:#X}",
        config.layout.name,
        config.layout.size(),
        config.separation,
        config.reverse_size
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_big5_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.layout, CodeLayout::big5());
        assert_eq!(config.separation, DEFAULT_SEPARATION);
        assert_eq!(config.reverse_size, DEFAULT_REVERSE_SIZE);
        assert_eq!(config.format, OutputFormat::Rust);
        assert!(config.input.is_none());
    }

    #[test]
    fn partial_layout_override_keeps_other_fields() {
        let config = parse_config(
            r#"
[layout]
name = "custom"
lead_base = 0xA1
rows = 0x5E

[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.layout.name, "custom");
        assert_eq!(config.layout.lead_base, 0xA1);
        assert_eq!(config.layout.rows, 94);
        assert_eq!(config.layout.row_width, 157);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn toml_format_names_match_cli_spelling() {
        for (name, expected) in [
            ("rust", OutputFormat::Rust),
            ("json", OutputFormat::Json),
            ("bincode", OutputFormat::Bincode),
        ] {
            let config = parse_config(&format!("[output]\nformat = \"{name}\"\n")).unwrap();
            assert_eq!(config.format, expected);
            assert_eq!(name.parse::<OutputFormat>().unwrap(), expected);
        }
    }

    #[test]
    fn shipped_big5_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/big5.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config.layout, CodeLayout::big5());
        assert_eq!(config.format, OutputFormat::Rust);
    }

    #[test]
    fn zero_separation_is_rejected() {
        let err = parse_config("[compile]\nseparation = 0\n").unwrap_err();
        let root = err.downcast_ref::<CoreError>();
        assert!(matches!(root, Some(CoreError::Config(_))));
    }

    #[test]
    fn oversized_reverse_table_is_rejected() {
        assert!(parse_config("[layout]\nreverse_size = 0x200000\n").is_err());
    }

    #[test]
    fn syntax_error_is_reported() {
        assert!(parse_config("[compile\nseparation = 4").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[source]\ninput = \"index.txt\"\n[compile]\nseparation = 32").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("index.txt")));
        assert_eq!(config.separation, 32);
    }

    #[test]
    fn load_config_missing_file() {
        assert!(load_config(Path::new("/nonexistent/idxtab.toml")).is_err());
    }
}
