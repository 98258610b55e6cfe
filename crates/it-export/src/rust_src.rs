use std::io::Write;

use anyhow::Result;
use it_core::tables::CompiledTableSet;
use it_core::traits::Emitter;

/// Émet les tables sous forme de source Rust.
///
/// Tables are written as sparse `(offset, value)` literals and expanded to
/// positional arrays by a `const fn` at compile time, so every slot not
/// listed is 0 (a hole) in the resulting `static`.
///
/// # Example
/// ```
/// use it_core::tables::{CompiledTableSet, EncodeTable};
/// use it_core::traits::Emitter;
/// use it_export::RustEmitter;
///
/// let set = CompiledTableSet {
///     name: "big5".into(),
///     decode_len: 3,
///     decode: vec![(1, 0x4E00)],
///     encode: vec![EncodeTable { low: 0x4E00, high: 0x4E01, entries: vec![(0, 0x8141)] }],
/// };
/// let mut out = Vec::new();
/// RustEmitter::new(None).emit(&set, &mut out).unwrap();
/// let src = String::from_utf8(out).unwrap();
/// assert!(src.contains("pub static DECODE: [u32; DECODE_LEN]"));
/// assert!(src.contains("    (1, 0x00004E00),"));
/// assert!(src.contains("    (0, 0x8141),"));
/// ```
pub struct RustEmitter {
    module_doc: Option<String>,
}

impl RustEmitter {
    #[must_use]
    pub fn new(module_doc: Option<String>) -> Self {
        Self { module_doc }
    }

    fn write_header(&self, t: &CompiledTableSet, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "// generated by idxtab {}; DO NOT EDIT", env!("CARGO_PKG_VERSION"))?;
        writeln!(out)?;
        if let Some(doc) = &self.module_doc {
            for line in doc.lines() {
                writeln!(out, "//! {line}")?;
            }
            writeln!(out)?;
        }
        writeln!(out, "/// Size of the {} code space.", t.name)?;
        writeln!(out, "pub const DECODE_LEN: usize = {};", t.decode_len)?;
        writeln!(out)?;
        writeln!(out, "pub const NUM_ENCODE_TABLES: usize = {};", t.num_encode_tables())?;
        writeln!(out)?;
        writeln!(out, "// ENCODE<i> are the encoding tables from Unicode to {} code,", t.name)?;
        writeln!(out, "// sorted by decreasing length.")?;
        for line in t.summary() {
            writeln!(out, "// {line}")?;
        }
        writeln!(out)?;
        Ok(())
    }
}

const DENSIFY: &str = "\
const fn densify_u32<const N: usize>(entries: &[(u32, u32)]) -> [u32; N] {
    let mut table = [0u32; N];
    let mut i = 0;
    while i < entries.len() {
        table[entries[i].0 as usize] = entries[i].1;
        i += 1;
    }
    table
}

const fn densify_u16<const N: usize>(entries: &[(u32, u16)]) -> [u16; N] {
    let mut table = [0u16; N];
    let mut i = 0;
    while i < entries.len() {
        table[entries[i].0 as usize] = entries[i].1;
        i += 1;
    }
    table
}
";

impl Emitter for RustEmitter {
    fn emit(&self, t: &CompiledTableSet, out: &mut dyn Write) -> Result<()> {
        self.write_header(t, out)?;
        writeln!(out, "{DENSIFY}")?;

        writeln!(out, "/// DECODE is the decoding table from {} code to Unicode.", t.name)?;
        writeln!(out, "pub static DECODE: [u32; DECODE_LEN] = densify_u32(&[")?;
        for &(index, codepoint) in &t.decode {
            writeln!(out, "    ({index}, 0x{codepoint:08X}),")?;
        }
        writeln!(out, "]);")?;

        for (i, table) in t.encode.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "pub const ENCODE{i}_LOW: u32 = {};", table.low)?;
            writeln!(out, "pub const ENCODE{i}_HIGH: u32 = {};", table.high)?;
            writeln!(out)?;
            writeln!(
                out,
                "pub static ENCODE{i}: [u16; (ENCODE{i}_HIGH - ENCODE{i}_LOW) as usize] = densify_u16(&["
            )?;
            for &(offset, value) in &table.entries {
                writeln!(out, "    ({offset}, 0x{value:04X}),")?;
            }
            writeln!(out, "]);")?;
        }

        log::debug!(
            "Source Rust émise : {} entrées de décodage, {} tables",
            t.decode.len(),
            t.num_encode_tables()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rust"
    }
}
