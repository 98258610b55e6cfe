use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use it_core::tables::CompiledTableSet;
use it_core::traits::Emitter;

/// Instantané JSON (indenté) du jeu de tables compilé.
///
/// Tables stay sparse: a consumer must treat any absent index or offset as
/// unmapped.
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, tables: &CompiledTableSet, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, tables).context("Sérialisation JSON")?;
        writeln!(out)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Instantané binaire bincode du jeu de tables compilé.
pub struct BincodeEmitter;

impl Emitter for BincodeEmitter {
    fn emit(&self, tables: &CompiledTableSet, out: &mut dyn Write) -> Result<()> {
        bincode::serialize_into(&mut *out, tables).context("Sérialisation bincode")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "bincode"
    }
}

/// Relit un instantané JSON ou bincode.
///
/// JSON is tried first, then bincode. A bincode snapshot can start with `{`
/// (the low byte of the name length), so the first byte alone is not enough.
///
/// # Errors
/// Returns an error if the bytes are not a valid snapshot in either format.
///
/// # Example
/// ```
/// use it_core::tables::CompiledTableSet;
/// use it_core::traits::Emitter;
/// use it_export::{JsonEmitter, read_snapshot};
///
/// let set = CompiledTableSet { name: "big5".into(), decode_len: 2, decode: vec![(1, 0x4E00)], encode: vec![] };
/// let mut buf = Vec::new();
/// JsonEmitter.emit(&set, &mut buf).unwrap();
/// assert_eq!(read_snapshot(&buf).unwrap(), set);
/// ```
pub fn read_snapshot(bytes: &[u8]) -> Result<CompiledTableSet> {
    let json_err = match serde_json::from_slice(bytes) {
        Ok(tables) => return Ok(tables),
        Err(e) => e,
    };
    bincode::deserialize(bytes).map_err(|bin_err| {
        anyhow::anyhow!("Instantané invalide (JSON : {json_err} ; bincode : {bin_err})")
    })
}

/// Lit un fichier d'instantané.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
pub fn read_snapshot_file(path: &Path) -> Result<CompiledTableSet> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
    read_snapshot(&bytes).with_context(|| format!("Instantané illisible : {}", path.display()))
}
