/// Emitters turning a compiled table set into Rust source or snapshots.

pub mod rust_src;
pub mod snapshot;

use it_core::config::OutputFormat;
use it_core::traits::Emitter;

pub use rust_src::RustEmitter;
pub use snapshot::{BincodeEmitter, JsonEmitter, read_snapshot, read_snapshot_file};

/// Choisit l'émetteur correspondant au format demandé.
#[must_use]
pub fn emitter_for(format: OutputFormat, module_doc: Option<String>) -> Box<dyn Emitter> {
    match format {
        OutputFormat::Rust => Box::new(RustEmitter::new(module_doc)),
        OutputFormat::Json => Box::new(JsonEmitter),
        OutputFormat::Bincode => Box::new(BincodeEmitter),
    }
}
