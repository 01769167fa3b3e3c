//! Advance Map `.map` layout decoding.
//!
//! A 20-byte header (dimensions, tileset indices, border size) is followed by
//! block data. FRLG files store the border right after the header; RSE files
//! store no border size in the header and may carry the border plus its
//! dimensions at the very end of the file. Both variants may contain a second
//! copy of the map, which is ignored.
//!
//! The RSE tail border is found heuristically: a candidate that would overlap
//! the primary map is dropped and the layout simply has no border.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::decode_map;
