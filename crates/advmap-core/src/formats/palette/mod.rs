//! Advance Map raw palette decoding.
//!
//! Palettes are a flat run of 4-byte RGBx groups with no header. Only the
//! total length is validated; any content decodes.

pub mod layout;
pub mod parser;

pub use parser::decode_palette;
