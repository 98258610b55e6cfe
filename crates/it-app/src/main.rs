use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use it_core::config::CompilerConfig;

pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Mode inspection : pas de compilation
    if let Some(ref snapshot) = cli.inspect {
        return pipeline::inspect(snapshot, &mut std::io::stdout().lock());
    }

    // 4. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;

    // 5. Compiler et émettre
    pipeline::run(&config)
}

/// Charge `--config` s'il existe, sinon les défauts Big5.
fn resolve_config(cli: &cli::Cli) -> Result<CompilerConfig> {
    if cli.config.exists() {
        it_core::config::load_config(&cli.config)
    } else if cli.config == PathBuf::from("config/big5.toml") {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(CompilerConfig::default())
    } else {
        anyhow::bail!("Config introuvable : {}", cli.config.display());
    }
}
