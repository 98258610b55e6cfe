use std::io::Write;

use crate::tables::CompiledTableSet;

/// Sérialise un jeu de tables compilé vers un flux de sortie.
///
/// Implémenté par : `RustEmitter`, `JsonEmitter`, `BincodeEmitter`.
///
/// # Example
/// ```
/// use it_core::traits::Emitter;
/// use it_core::tables::CompiledTableSet;
/// use std::io::Write;
///
/// struct CountEmitter;
/// impl Emitter for CountEmitter {
///     fn emit(&self, tables: &CompiledTableSet, out: &mut dyn Write) -> anyhow::Result<()> {
///         writeln!(out, "{}", tables.num_encode_tables())?;
///         Ok(())
///     }
///     fn name(&self) -> &'static str { "count" }
/// }
/// ```
pub trait Emitter {
    /// Écrit la représentation complète de `tables` dans `out`.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    fn emit(&self, tables: &CompiledTableSet, out: &mut dyn Write) -> anyhow::Result<()>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
