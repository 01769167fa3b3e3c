//! Advance Map 1.92 legacy project importer.
//!
//! This crate decodes the binary files written by the legacy "Advance Map
//! 1.92" editor into a typed data model: map layouts (`.map`), metatile banks
//! (`.bvd`) and raw palettes. Decoders are byte-oriented and side-effect free
//! (layout/reader/parser per format); file access is isolated in the `import`
//! layer, which wraps decoder failures with the offending path.
//!
//! Invariants:
//! - Decoding is deterministic: the same bytes and context give the same value.
//! - The RSE/FRLG family is resolved once per decode and threaded through.
//! - Decoders never read ambient configuration; all context is explicit.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use advmap_core::{TilesetRegistry, parse_layout};
//!
//! let registry = TilesetRegistry::default();
//! let layout = parse_layout(Path::new("route101.map"), &registry)?;
//! println!("{}x{}", layout.width, layout.height);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod attributes;
pub mod config;
pub mod formats;
mod import;
mod registry;

pub use attributes::{AttributeLayout, BitField, MetatileAttributes};
pub use config::{BaseGame, ConfigError, MetatileLimits, ProjectConfig, load_config};
pub use formats::bvd::{MetatileOptions, decode_bvd};
pub use formats::error::DecodeError;
pub use formats::map::decode_map;
pub use formats::palette::decode_palette;
pub use import::{FileKind, ImportError, parse_layout, parse_metatiles, parse_palette};
pub use registry::{
    FALLBACK_PRIMARY_TILESET, FALLBACK_SECONDARY_TILESET, TilesetRegistry, TilesetSlot,
};

/// Current import report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Border width used when a layout declares none.
pub const DEFAULT_BORDER_WIDTH: i32 = 2;
/// Border height used when a layout declares none.
pub const DEFAULT_BORDER_HEIGHT: i32 = 2;
/// Tiles stored per metatile in a `.bvd` file.
pub const METATILE_TILE_COUNT: usize = 8;
/// Tiles per metatile when triple-layer metatiles are enabled.
pub const TRIPLE_LAYER_TILE_COUNT: usize = 12;

/// Row-major grid of packed metatile words, origin top-left.
pub type Blockdata = Vec<u16>;

/// Binary layout family of an Advance Map file.
///
/// `Rse` covers Ruby/Sapphire/Emerald targets, `Frlg` covers FireRed/LeafGreen.
///
/// # Examples
/// ```
/// use advmap_core::Family;
///
/// assert_eq!(Family::Rse.attributes_size(), 2);
/// assert_eq!(Family::Frlg.attributes_size(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Rse,
    Frlg,
}

impl Family {
    /// Width in bytes of one metatile attribute record.
    pub const fn attributes_size(self) -> usize {
        match self {
            Family::Rse => 2,
            Family::Frlg => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Family::Rse => "RSE",
            Family::Frlg => "FRLG",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded map layout.
///
/// # Examples
/// ```
/// use advmap_core::Layout;
///
/// let layout = Layout {
///     width: 1,
///     height: 1,
///     border_width: 2,
///     border_height: 2,
///     primary_tileset_label: "gTileset_General".to_string(),
///     secondary_tileset_label: "gTileset_Petalburg".to_string(),
///     blockdata: vec![0x3001],
///     border: None,
/// };
/// assert_eq!(layout.blockdata.len(), (layout.width * layout.height) as usize);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    /// Border width (default substituted when the file declares zero).
    pub border_width: i32,
    /// Border height (default substituted when the file declares zero).
    pub border_height: i32,
    pub primary_tileset_label: String,
    pub secondary_tileset_label: String,
    /// Main grid, `width * height` words.
    pub blockdata: Blockdata,
    /// Border grid, `border_width * border_height` words, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Blockdata>,
}

/// One 8x8 tile reference inside a metatile.
///
/// # Examples
/// ```
/// use advmap_core::Tile;
///
/// let tile = Tile::from_raw(0x5C01);
/// assert_eq!(tile.tile_id, 1);
/// assert!(tile.yflip);
/// assert!(tile.xflip);
/// assert_eq!(tile.palette, 5);
/// assert_eq!(tile.raw(), 0x5C01);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub tile_id: u16,
    pub xflip: bool,
    pub yflip: bool,
    pub palette: u8,
}

impl Tile {
    pub const TILE_ID_MASK: u16 = 0x03FF;
    pub const XFLIP_BIT: u16 = 1 << 10;
    pub const YFLIP_BIT: u16 = 1 << 11;
    pub const PALETTE_SHIFT: u16 = 12;

    pub fn from_raw(raw: u16) -> Self {
        Self {
            tile_id: raw & Self::TILE_ID_MASK,
            xflip: raw & Self::XFLIP_BIT != 0,
            yflip: raw & Self::YFLIP_BIT != 0,
            palette: (raw >> Self::PALETTE_SHIFT) as u8,
        }
    }

    /// Pack back into the 16-bit on-disk word.
    pub fn raw(&self) -> u16 {
        let mut raw = self.tile_id & Self::TILE_ID_MASK;
        if self.xflip {
            raw |= Self::XFLIP_BIT;
        }
        if self.yflip {
            raw |= Self::YFLIP_BIT;
        }
        raw | (u16::from(self.palette & 0x0F) << Self::PALETTE_SHIFT)
    }
}

/// Metatile: 8 (or 12, triple-layer) tiles plus packed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metatile {
    pub tiles: Vec<Tile>,
    /// Raw attribute bitfield as stored in the file.
    pub attributes: u32,
    /// Family whose bit layout was used to decode `decoded`.
    pub family: Family,
    pub decoded: MetatileAttributes,
}

impl Metatile {
    pub fn new(tiles: Vec<Tile>, attributes: u32, family: Family) -> Self {
        Self {
            tiles,
            attributes,
            family,
            decoded: MetatileAttributes::decode(attributes, family),
        }
    }
}

/// 24-bit color.
///
/// # Examples
/// ```
/// use advmap_core::Color;
///
/// let color = Color { red: 0xFF, green: 0x80, blue: 0x00 };
/// assert_eq!(color.to_string(), "#ff8000");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Import report wrapping one decoded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    #[serde(flatten)]
    pub data: ImportedData,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the importer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Decoded payload of an import report, tagged by file kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImportedData {
    Map { layout: Layout },
    Metatiles { metatiles: Vec<Metatile> },
    Palette { colors: Vec<Color> },
}

/// Build a report for one decoded file.
///
/// # Examples
/// ```
/// use advmap_core::{ImportedData, make_report};
///
/// let report = make_report("pal.bin", 0, ImportedData::Palette { colors: Vec::new() });
/// assert_eq!(report.report_version, advmap_core::REPORT_VERSION);
/// ```
pub fn make_report(input_path: &str, input_bytes: u64, data: ImportedData) -> ImportReport {
    ImportReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "advmap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_round_trips_every_field() {
        let tile = Tile {
            tile_id: 0x3FF,
            xflip: false,
            yflip: true,
            palette: 0xF,
        };
        assert_eq!(tile.raw(), 0xFBFF);
        assert_eq!(Tile::from_raw(0xFBFF), tile);
    }

    #[test]
    fn default_tile_is_zero_word() {
        assert_eq!(Tile::default().raw(), 0);
    }

    #[test]
    fn report_omits_missing_border_and_tags_kind() {
        let layout = Layout {
            width: 1,
            height: 1,
            border_width: DEFAULT_BORDER_WIDTH,
            border_height: DEFAULT_BORDER_HEIGHT,
            primary_tileset_label: FALLBACK_PRIMARY_TILESET.to_string(),
            secondary_tileset_label: FALLBACK_SECONDARY_TILESET.to_string(),
            blockdata: vec![7],
            border: None,
        };
        let report = make_report("a.map", 22, ImportedData::Map { layout });

        let value = serde_json::to_value(&report).expect("report json");
        assert_eq!(value["kind"], "map");
        assert_eq!(value["input"]["bytes"], 22);
        assert!(value["layout"].get("border").is_none());
        assert_eq!(value["layout"]["blockdata"][0], 7);
    }

    #[test]
    fn metatile_serializes_family_lowercase() {
        let metatile = Metatile::new(vec![Tile::default(); METATILE_TILE_COUNT], 0x10, Family::Frlg);
        let value = serde_json::to_value(&metatile).expect("metatile json");
        assert_eq!(value["family"], "frlg");
        assert_eq!(value["decoded"]["behavior"], 0x10);
    }
}
