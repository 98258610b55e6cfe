/// Index sources and index line parsing for idxtab.

pub mod parse;
pub mod source;

pub use parse::{IndexLines, parse_line};
pub use source::IndexSource;
