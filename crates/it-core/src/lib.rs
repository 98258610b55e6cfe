/// Configuration, types, and shared structures for idxtab.
///
/// This crate contains the data model shared by the parser, the table
/// compiler and the emitters, plus the configuration layer.

pub mod config;
pub mod error;
pub mod layout;
pub mod tables;
pub mod traits;

pub use config::CompilerConfig;
pub use error::CoreError;
pub use layout::CodeLayout;
pub use tables::{CompiledTableSet, EncodeTable, ForwardTable, Interval, RawPair, ReverseTable};
