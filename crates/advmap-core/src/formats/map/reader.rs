use std::ops::Range;

use super::layout;
use crate::Blockdata;
use crate::formats::common::reader::ByteReader;
use crate::formats::error::DecodeError;

/// Fixed `.map` header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeader {
    pub width: u32,
    pub height: u32,
    pub primary_tileset_index: u32,
    pub secondary_tileset_index: u32,
    pub border_width: u8,
    pub border_height: u8,
}

impl RawHeader {
    /// Border tiles declared in the header (0 for RSE files).
    pub fn num_border_tiles(&self) -> u64 {
        u64::from(self.border_width) * u64::from(self.border_height)
    }

    /// Size in bytes of one copy of the main block data.
    pub fn map_size(&self) -> u64 {
        u64::from(self.width)
            .saturating_mul(u64::from(self.height))
            .saturating_mul(layout::BLOCK_SIZE)
    }
}

pub struct MapReader<'a> {
    inner: ByteReader<'a>,
}

impl<'a> MapReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            inner: ByteReader::new(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn require_len(&self, needed: u64) -> Result<(), DecodeError> {
        self.inner.require_len(needed)
    }

    pub fn read_header(&self) -> Result<RawHeader, DecodeError> {
        self.inner.require_len(layout::HEADER_LEN as u64)?;
        Ok(RawHeader {
            width: self.inner.read_u32_le(layout::WIDTH_RANGE)?,
            height: self.inner.read_u32_le(layout::HEIGHT_RANGE)?,
            primary_tileset_index: self.inner.read_u32_le(layout::PRIMARY_TILESET_RANGE)?,
            secondary_tileset_index: self.inner.read_u32_le(layout::SECONDARY_TILESET_RANGE)?,
            border_width: self.inner.read_u8(layout::BORDER_WIDTH_OFFSET)?,
            border_height: self.inner.read_u8(layout::BORDER_HEIGHT_OFFSET)?,
        })
    }

    /// Border `(width, height)` stored in the last 4 bytes of an RSE file.
    pub fn read_rse_border_dimensions(&self) -> Result<(u16, u16), DecodeError> {
        self.inner
            .require_len(layout::RSE_BORDER_DIMENSIONS_LEN as u64)?;
        let start = self.inner.len() - layout::RSE_BORDER_DIMENSIONS_LEN;
        Ok((
            self.inner.read_u16_le(start..start + 2)?,
            self.inner.read_u16_le(start + 2..start + 4)?,
        ))
    }

    pub fn read_blockdata(&self, range: Range<usize>) -> Result<Blockdata, DecodeError> {
        self.inner.read_u16_words(range)
    }
}
