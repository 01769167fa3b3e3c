//! Advance Map `.bvd` metatile bank decoding.
//!
//! The trailing 4-byte signature selects the family and with it the width of
//! each attribute record. A file holds either one tileset or two (primary then
//! secondary); the variant is inferred from the total size alone. In the
//! two-tileset variant both tile blocks come first, then both attribute
//! blocks.
//!
//! Errors cover bad sizes, unknown signatures and out-of-range counts.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{MetatileOptions, decode_bvd};
