use log::debug;

use super::layout;
use super::reader::BvdReader;
use crate::formats::error::DecodeError;
use crate::{Family, Metatile, TRIPLE_LAYER_TILE_COUNT, Tile, TilesetSlot};

/// Caller-supplied context for `.bvd` decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetatileOptions {
    /// Which half of a two-tileset file to decode; also picks the count limit.
    pub slot: TilesetSlot,
    /// Pad every metatile to 12 tiles.
    pub triple_layer: bool,
    /// Upper bound on the declared metatile count.
    pub max_metatiles: usize,
}

impl MetatileOptions {
    pub fn new(slot: TilesetSlot, max_metatiles: usize) -> Self {
        Self {
            slot,
            triple_layer: false,
            max_metatiles,
        }
    }

    pub fn with_triple_layer(mut self, triple_layer: bool) -> Self {
        self.triple_layer = triple_layer;
        self
    }
}

/// Offsets of the tile and attribute blocks to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankLayout {
    pub double_tileset: bool,
    pub tiles_offset: usize,
    pub attributes_offset: usize,
}

/// Decode an Advance Map 1.92 `.bvd` metatile bank.
///
/// # Examples
/// ```
/// use advmap_core::{MetatileOptions, TilesetSlot, decode_bvd};
///
/// let mut bytes = 1u32.to_le_bytes().to_vec();
/// bytes.extend_from_slice(&[0u8; 16]);
/// bytes.extend_from_slice(&0x0010u16.to_le_bytes());
/// bytes.extend_from_slice(b"RSE ");
///
/// let metatiles = decode_bvd(&bytes, MetatileOptions::new(TilesetSlot::Primary, 512))?;
/// assert_eq!(metatiles.len(), 1);
/// assert_eq!(metatiles[0].tiles.len(), 8);
/// assert_eq!(metatiles[0].decoded.behavior, 0x10);
/// # Ok::<(), advmap_core::DecodeError>(())
/// ```
pub fn decode_bvd(bytes: &[u8], options: MetatileOptions) -> Result<Vec<Metatile>, DecodeError> {
    if bytes.len() < layout::MIN_LEN || bytes.len() % 2 != 0 {
        return Err(DecodeError::malformed(
            bytes.len(),
            format!(
                "a .bvd file must have an even length of at least {} bytes",
                layout::MIN_LEN
            ),
        ));
    }

    let reader = BvdReader::new(bytes);
    let family = reader.read_family()?;
    let count = reader.read_count()?;
    if count as u64 > options.max_metatiles as u64 {
        return Err(DecodeError::TooManyMetatiles {
            count,
            max: options.max_metatiles,
        });
    }
    if count == 0 {
        return Err(DecodeError::EmptyData);
    }

    let bank = locate_bank(reader.len(), count, family, options.slot)?;
    debug!(
        "{family} .bvd bank: {count} metatiles, double tileset: {}, tiles at {}, attributes at {}",
        bank.double_tileset, bank.tiles_offset, bank.attributes_offset
    );

    let attributes_size = family.attributes_size();
    let metatile_size = layout::METATILE_SIZE as usize;
    (0..count as usize)
        .map(|index| {
            let mut tiles = reader.read_tiles(bank.tiles_offset + index * metatile_size)?;
            if options.triple_layer {
                tiles.resize(TRIPLE_LAYER_TILE_COUNT, Tile::default());
            }
            let attributes = reader
                .read_attributes(bank.attributes_offset + index * attributes_size, family)?;
            Ok(Metatile::new(tiles, attributes, family))
        })
        .collect()
}

/// Pick the single- or double-tileset variant from the file size.
pub fn locate_bank(
    length: usize,
    count: u32,
    family: Family,
    slot: TilesetSlot,
) -> Result<BankLayout, DecodeError> {
    let tiles_size = u64::from(count) * layout::METATILE_SIZE;
    let attributes_size = u64::from(count) * family.attributes_size() as u64;
    let single = tiles_size + attributes_size + layout::FRAMING_LEN;
    let double = 2 * (tiles_size + attributes_size) + layout::FRAMING_LEN;

    let header = layout::HEADER_LEN;
    let (double_tileset, tiles_offset, attributes_offset) = if length as u64 == double {
        match slot {
            TilesetSlot::Primary => (true, header, header + 2 * tiles_size),
            TilesetSlot::Secondary => (
                true,
                header + tiles_size,
                header + 2 * tiles_size + attributes_size,
            ),
        }
    } else if length as u64 == single {
        (false, header, header + tiles_size)
    } else {
        return Err(DecodeError::malformed(
            length,
            format!("expected {single} or {double} bytes for {count} metatiles"),
        ));
    };

    // Both offsets lie inside a buffer whose length was just matched.
    Ok(BankLayout {
        double_tileset,
        tiles_offset: tiles_offset as usize,
        attributes_offset: attributes_offset as usize,
    })
}
