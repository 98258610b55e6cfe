use std::path::PathBuf;

use clap::Parser;
use it_core::config::{CompilerConfig, OutputFormat};

/// idxtab — compile un index d'encodage multi-octets en tables de décodage/encodage.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier d'index local, `-` pour stdin. Remplace l'URL de la config.
    #[arg(long, conflicts_with = "url")]
    pub input: Option<PathBuf>,

    /// URL de l'index à télécharger (via curl).
    #[arg(long)]
    pub url: Option<String>,

    /// Fichier de sortie. Défaut : stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/big5.toml.
    #[arg(short, long, default_value = "config/big5.toml")]
    pub config: PathBuf,

    /// Format de sortie : rust, json, bincode.
    #[arg(long)]
    pub format: Option<String>,

    /// Nombre minimal de trous consécutifs séparant deux tables d'encodage.
    #[arg(long)]
    pub separation: Option<u32>,

    /// Affiche le résumé d'un instantané JSON/bincode au lieu de compiler.
    #[arg(long)]
    pub inspect: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Applique les options CLI par-dessus la configuration chargée.
    ///
    /// # Errors
    /// Returns an error for an unknown `--format` or an invalid resulting config.
    pub fn apply_overrides(&self, config: &mut CompilerConfig) -> anyhow::Result<()> {
        if let Some(ref input) = self.input {
            config.input = Some(input.clone());
        }
        if let Some(ref url) = self.url {
            config.url.clone_from(url);
            config.input = None;
        }
        if let Some(ref output) = self.output {
            config.output = Some(output.clone());
        }
        if let Some(ref format) = self.format {
            config.format = format.parse::<OutputFormat>()?;
        }
        if let Some(separation) = self.separation {
            config.separation = separation;
        }
        config.validate()?;
        Ok(())
    }
}
