use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use it_compile::compile_pairs;
use it_core::config::CompilerConfig;
use it_core::tables::CompiledTableSet;
use it_export::{emitter_for, read_snapshot_file};
use it_source::{IndexLines, IndexSource};

/// Source → parsing → ingestion → compilation → émission.
///
/// The artifact is rendered in memory and only written once every stage
/// succeeded: a failed run leaves no output file behind.
///
/// # Errors
/// Retourne une erreur si la source est illisible, si une ligne est
/// malformée ou hors bornes, ou si l'écriture échoue.
pub fn run(config: &CompilerConfig) -> Result<()> {
    let source = IndexSource::resolve(config.input.as_deref(), &config.url);
    log::info!("Source : {source}");

    let reader = source.open()?;
    let tables = compile_pairs(config, IndexLines::new(reader))
        .with_context(|| format!("Compilation de {source} interrompue"))?;

    let bytes = render(config, &tables)?;
    write_output(config.output.as_deref(), &bytes)
}

/// Sérialise `tables` dans le format configuré.
///
/// # Errors
/// Returns an error if the emitter fails.
pub fn render(config: &CompilerConfig, tables: &CompiledTableSet) -> Result<Vec<u8>> {
    let emitter = emitter_for(config.format, config.module_doc.clone());
    let mut buf = Vec::new();
    emitter
        .emit(tables, &mut buf)
        .with_context(|| format!("Émission {} échouée", emitter.name()))?;
    log::info!("{} octets émis ({})", buf.len(), emitter.name());
    Ok(buf)
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            write_atomic(path, bytes)
                .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
            log::info!("Tables écrites dans {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Writes a sibling temp file, then renames it over `path`.
///
/// The target is either left untouched or fully replaced; a failed write
/// drops (and deletes) the temp file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Affiche le résumé d'un instantané JSON ou bincode.
///
/// # Errors
/// Returns an error if the snapshot cannot be read.
pub fn inspect(path: &Path, out: &mut dyn Write) -> Result<()> {
    let tables = read_snapshot_file(path)?;
    writeln!(
        out,
        "{} : {} / {} index mappés, {} tables d'encodage",
        tables.name,
        tables.decode.len(),
        tables.decode_len,
        tables.num_encode_tables()
    )?;
    for line in tables.summary() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use it_core::config::OutputFormat;

    const INDEX: &str = "\
# Big5 index (extract)
942\t0x4E00\t一
943\t0x4E59\t乙
2148\t0x8005\t者
6543\t0x8005\t者
5024\t0x20547
";

    fn config_for(dir: &Path, format: OutputFormat) -> CompilerConfig {
        let input = dir.join("index-big5.txt");
        let mut file = std::fs::File::create(&input).unwrap();
        file.write_all(INDEX.as_bytes()).unwrap();
        CompilerConfig {
            input: Some(input),
            output: Some(dir.join("out")),
            format,
            ..CompilerConfig::default()
        }
    }

    #[test]
    fn rust_output_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), OutputFormat::Rust);
        run(&config).unwrap();
        let src = std::fs::read_to_string(dir.path().join("out")).unwrap();
        assert!(src.contains("pub const NUM_ENCODE_TABLES: usize = 3;"));
        // Last occurrence of U+8005 wins: index 6543 = 0xAACC.
        assert!(src.contains("0xAACC"));
        assert!(!src.contains("0x8ECD"));
    }

    #[test]
    fn json_output_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), OutputFormat::Json);
        run(&config).unwrap();
        let tables = read_snapshot_file(&dir.path().join("out")).unwrap();
        assert_eq!(tables.decode(942), Some(0x4E00));
        assert_eq!(tables.encode(0x2_0547), Some(it_core::CodeLayout::big5().pack(5024)));
        assert_eq!(tables.encode(0x8005), Some(0xAACC));

        let mut report = Vec::new();
        inspect(&dir.path().join("out"), &mut report).unwrap();
        let report = String::from_utf8(report).unwrap();
        assert!(report.starts_with("big5 : 5 / 19782 index mappés, 3 tables d'encodage"));
    }

    #[test]
    fn failed_run_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path(), OutputFormat::Bincode);
        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "0 0x4E00\n99999 0x4E01\n").unwrap();
        config.input = Some(bad);
        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("99999"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn rerun_replaces_output_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::write(&out, "ancienne sortie, bien plus longue que la nouvelle ".repeat(2000))
            .unwrap();
        let config = config_for(dir.path(), OutputFormat::Bincode);
        run(&config).unwrap();

        let tables = read_snapshot_file(&out).unwrap();
        assert_eq!(tables.encode(0x8005), Some(0xAACC));
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["index-big5.txt", "out"]);
    }

    #[test]
    fn unwritable_target_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way: the rename fails after the temp file is written.
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("keep"), "intact").unwrap();
        let config = config_for(dir.path(), OutputFormat::Json);
        assert!(run(&config).is_err());

        assert_eq!(std::fs::read_to_string(out.join("keep")).unwrap(), "intact");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn missing_input_is_reported() {
        let config = CompilerConfig {
            input: Some("/nonexistent/index.txt".into()),
            ..CompilerConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
