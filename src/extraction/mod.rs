//! Relocation extraction from a solved flow network.

mod extractor;

pub use extractor::extract_relocations;
