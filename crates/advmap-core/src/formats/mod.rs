//! Advance Map 1.92 file decoding modules.
//!
//! Each format follows a layered structure:
//! - `layout`: byte offsets, sizes and constants (source of truth)
//! - `reader`: safe byte access and format conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//!
//! All formats share one `DecodeError`. Parsers are pure and contain no I/O;
//! the import layer handles file access.

pub mod bvd;
pub(crate) mod common;
pub mod error;
pub mod map;
pub mod palette;
