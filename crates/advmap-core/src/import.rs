use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::formats::bvd::{MetatileOptions, decode_bvd};
use crate::formats::error::DecodeError;
use crate::formats::map::decode_map;
use crate::formats::palette::decode_palette;
use crate::{Color, Layout, Metatile, TilesetRegistry};

/// Kind of Advance Map file being imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Map,
    Metatiles,
    Palette,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Map => f.write_str("Advance Map 1.92 Map .map file"),
            FileKind::Metatiles => f.write_str("Advance Map 1.92 Metatile .bvd file"),
            FileKind::Palette => f.write_str("Advance Map 1.92 palette file"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not open {kind} '{}': {source}", path.display())]
    Io {
        kind: FileKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{kind} '{}': {source}", path.display())]
    Decode {
        kind: FileKind,
        path: PathBuf,
        source: DecodeError,
    },
}

impl ImportError {
    pub fn kind(&self) -> FileKind {
        match self {
            ImportError::Io { kind, .. } | ImportError::Decode { kind, .. } => *kind,
        }
    }

    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            ImportError::Decode { source, .. } => Some(source),
            ImportError::Io { .. } => None,
        }
    }
}

/// Import an Advance Map `.map` file.
pub fn parse_layout(path: &Path, registry: &TilesetRegistry) -> Result<Layout, ImportError> {
    let layout = import_file(path, FileKind::Map, |bytes| decode_map(bytes, registry))?;
    info!(
        "imported {}x{} layout from '{}'",
        layout.width,
        layout.height,
        path.display()
    );
    Ok(layout)
}

/// Import an Advance Map `.bvd` metatile bank.
pub fn parse_metatiles(
    path: &Path,
    options: MetatileOptions,
) -> Result<Vec<Metatile>, ImportError> {
    let metatiles = import_file(path, FileKind::Metatiles, |bytes| decode_bvd(bytes, options))?;
    info!(
        "imported {} {} metatiles from '{}'",
        metatiles.len(),
        options.slot,
        path.display()
    );
    Ok(metatiles)
}

/// Import an Advance Map raw palette.
pub fn parse_palette(path: &Path) -> Result<Vec<Color>, ImportError> {
    let colors = import_file(path, FileKind::Palette, decode_palette)?;
    info!("imported {} colors from '{}'", colors.len(), path.display());
    Ok(colors)
}

fn import_file<T>(
    path: &Path,
    kind: FileKind,
    decode: impl FnOnce(&[u8]) -> Result<T, DecodeError>,
) -> Result<T, ImportError> {
    let result = fs::read(path)
        .map_err(|source| ImportError::Io {
            kind,
            path: path.to_path_buf(),
            source,
        })
        .and_then(|bytes| {
            decode(&bytes).map_err(|source| ImportError::Decode {
                kind,
                path: path.to_path_buf(),
                source,
            })
        });
    if let Err(err) = &result {
        debug!("{err}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{FileKind, ImportError};
    use crate::formats::error::DecodeError;
    use std::path::PathBuf;

    #[test]
    fn decode_error_message_names_file() {
        let err = ImportError::Decode {
            kind: FileKind::Palette,
            path: PathBuf::from("pal.bin"),
            source: DecodeError::malformed(6, "palette length must be a multiple of 4"),
        };
        assert_eq!(
            err.to_string(),
            "Advance Map 1.92 palette file 'pal.bin': unexpected size of 6 bytes: \
             palette length must be a multiple of 4"
        );
        assert_eq!(err.kind(), FileKind::Palette);
        assert!(matches!(
            err.decode_error(),
            Some(DecodeError::MalformedSize { length: 6, .. })
        ));
    }
}
