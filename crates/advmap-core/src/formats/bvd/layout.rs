pub const COUNT_RANGE: std::ops::Range<usize> = 0..4;
pub const HEADER_LEN: u64 = 4;
pub const SIGNATURE_LEN: usize = 4;
/// Header, signature and at least one byte in between.
pub const MIN_LEN: usize = 9;

pub const RSE_SIGNATURE: &[u8; SIGNATURE_LEN] = b"RSE ";
pub const FRLG_SIGNATURE: &[u8; SIGNATURE_LEN] = b"FRLG";

pub const TILE_SIZE: usize = 2;
/// Stored metatiles always hold 8 tiles, whatever the layer mode.
pub const METATILE_SIZE: u64 = (crate::METATILE_TILE_COUNT * TILE_SIZE) as u64;

/// Header plus trailing signature.
pub const FRAMING_LEN: u64 = HEADER_LEN + SIGNATURE_LEN as u64;
