/// Table compiler for idxtab.
///
/// Ingests `(index, codepoint)` pairs into dense forward/reverse tables, then
/// splits the reverse table into gap-merged intervals and emits the sparse
/// decode and encode tables.
pub mod compiler;
pub mod ingest;
pub mod interval;

pub use compiler::{compile, compile_pairs};
pub use ingest::{IngestStats, MappingIngestor};
pub use interval::{extract_intervals, sort_by_decreasing_length};
