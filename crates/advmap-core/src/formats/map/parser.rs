use std::ops::Range;

use log::debug;

use super::layout;
use super::reader::{MapReader, RawHeader};
use crate::formats::error::DecodeError;
use crate::{
    DEFAULT_BORDER_HEIGHT, DEFAULT_BORDER_WIDTH, Family, Layout, TilesetRegistry, TilesetSlot,
};

/// Border block region located inside a `.map` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderRegion {
    pub range: Range<usize>,
    pub width: u32,
    pub height: u32,
}

/// Where the decodable data of a `.map` file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRegions {
    pub family: Family,
    pub map: Range<usize>,
    pub border: Option<BorderRegion>,
    /// A second, ignored copy of the map follows the first one.
    pub duplicate_map: bool,
}

/// Decode an Advance Map 1.92 `.map` file.
///
/// Tileset indices are resolved through `registry`; an index pointing at a
/// label from the wrong slot falls back to that slot's default.
///
/// # Examples
/// ```
/// use advmap_core::{TilesetRegistry, decode_map};
///
/// let mut bytes = vec![0u8; 22];
/// bytes[0..4].copy_from_slice(&1u32.to_le_bytes());
/// bytes[4..8].copy_from_slice(&1u32.to_le_bytes());
/// bytes[20..22].copy_from_slice(&0x0123u16.to_le_bytes());
///
/// let layout = decode_map(&bytes, &TilesetRegistry::default())?;
/// assert_eq!(layout.blockdata, vec![0x0123]);
/// assert!(layout.border.is_none());
/// # Ok::<(), advmap_core::DecodeError>(())
/// ```
pub fn decode_map(bytes: &[u8], registry: &TilesetRegistry) -> Result<Layout, DecodeError> {
    if bytes.len() < layout::HEADER_LEN || bytes.len() % 2 != 0 {
        return Err(DecodeError::malformed(
            bytes.len(),
            format!(
                "a .map file must have an even length of at least {} bytes",
                layout::HEADER_LEN
            ),
        ));
    }

    let reader = MapReader::new(bytes);
    let header = reader.read_header()?;
    let regions = locate_regions(&reader, &header)?;
    debug!(
        "{} .map layout: {}x{}, map data at {:?}, border {:?}, duplicate map: {}",
        regions.family,
        header.width,
        header.height,
        regions.map,
        regions.border,
        regions.duplicate_map
    );

    let blockdata = reader.read_blockdata(regions.map.clone())?;
    let (border_width, border_height, border) = match regions.border {
        Some(region) => {
            let border = reader.read_blockdata(region.range)?;
            let border = if border.is_empty() { None } else { Some(border) };
            (region.width, region.height, border)
        }
        None => (0, 0, None),
    };

    Ok(Layout {
        width: to_dimension(header.width, bytes.len(), "width")?,
        height: to_dimension(header.height, bytes.len(), "height")?,
        border_width: border_dimension(border_width, DEFAULT_BORDER_WIDTH),
        border_height: border_dimension(border_height, DEFAULT_BORDER_HEIGHT),
        primary_tileset_label: registry.resolve(TilesetSlot::Primary, header.primary_tileset_index),
        secondary_tileset_label: registry
            .resolve(TilesetSlot::Secondary, header.secondary_tileset_index),
        blockdata,
        border,
    })
}

/// Locate the map and border regions and detect the file family.
pub fn locate_regions(
    reader: &MapReader<'_>,
    header: &RawHeader,
) -> Result<MapRegions, DecodeError> {
    let num_border_tiles = header.num_border_tiles();
    let map_offset = layout::HEADER_LEN as u64 + num_border_tiles * layout::BLOCK_SIZE;
    let map_size = header.map_size();
    let map_end = map_offset.saturating_add(map_size);
    reader.require_len(map_end)?;

    // Past this point every offset up to `map_end` lies within the buffer.
    let map = map_offset as usize..map_end as usize;
    let double_map_end = map_end.saturating_add(map_size);
    let len = reader.len() as u64;

    if num_border_tiles != 0 {
        return Ok(MapRegions {
            family: Family::Frlg,
            border: Some(BorderRegion {
                range: layout::HEADER_LEN..map.start,
                width: u32::from(header.border_width),
                height: u32::from(header.border_height),
            }),
            map,
            duplicate_map: len >= double_map_end,
        });
    }

    let (border, duplicate_map) = locate_rse_border(reader, map_end, double_map_end)?;
    Ok(MapRegions {
        family: Family::Rse,
        map,
        border,
        duplicate_map,
    })
}

fn locate_rse_border(
    reader: &MapReader<'_>,
    map_end: u64,
    double_map_end: u64,
) -> Result<(Option<BorderRegion>, bool), DecodeError> {
    let len = reader.len() as u64;
    let dims_len = layout::RSE_BORDER_DIMENSIONS_LEN as u64;
    if len < map_end + dims_len {
        return Ok((None, false));
    }

    let (width, height) = reader.read_rse_border_dimensions()?;
    let border_size = u64::from(width) * u64::from(height) * layout::BLOCK_SIZE;
    let offset = match len.checked_sub(border_size + dims_len) {
        Some(offset) if offset >= map_end => offset,
        _ => {
            debug!(
                "ignoring RSE border candidate {width}x{height}: it would overlap the map data"
            );
            return Ok((None, false));
        }
    };

    Ok((
        Some(BorderRegion {
            range: offset as usize..(offset + border_size) as usize,
            width: u32::from(width),
            height: u32::from(height),
        }),
        offset >= double_map_end,
    ))
}

fn to_dimension(value: u32, length: usize, name: &str) -> Result<i32, DecodeError> {
    i32::try_from(value)
        .map_err(|_| DecodeError::malformed(length, format!("map {name} {value} is out of range")))
}

fn border_dimension(value: u32, default: i32) -> i32 {
    // Border dimensions come from a u8 or u16 field and always fit.
    match i32::try_from(value) {
        Ok(0) | Err(_) => default,
        Ok(value) => value,
    }
}
