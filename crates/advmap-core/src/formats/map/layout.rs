pub const HEADER_LEN: usize = 20;

pub const WIDTH_RANGE: std::ops::Range<usize> = 0..4;
pub const HEIGHT_RANGE: std::ops::Range<usize> = 4..8;
pub const PRIMARY_TILESET_RANGE: std::ops::Range<usize> = 8..12;
pub const SECONDARY_TILESET_RANGE: std::ops::Range<usize> = 12..16;
pub const BORDER_WIDTH_OFFSET: usize = 16;
pub const BORDER_HEIGHT_OFFSET: usize = 17;

/// Bytes per block word.
pub const BLOCK_SIZE: u64 = 2;

/// RSE files end with the border width and height as two u16 words.
pub const RSE_BORDER_DIMENSIONS_LEN: usize = 4;
