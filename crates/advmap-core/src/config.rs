//! Project configuration for the importer (`advmap.toml`).
//!
//! The configuration supplies what the decoders cannot learn from the files
//! themselves: the target base game (metatile limits), the triple-layer flag,
//! and the tileset label registry.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::formats::bvd::MetatileOptions;
use crate::{TilesetRegistry, TilesetSlot};

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "advmap.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse advmap.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Decomp project the imported data targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseGame {
    Pokeruby,
    #[default]
    Pokeemerald,
    Pokefirered,
}

impl BaseGame {
    pub fn default_limits(self) -> MetatileLimits {
        let metatiles_primary = match self {
            BaseGame::Pokeruby | BaseGame::Pokeemerald => 512,
            BaseGame::Pokefirered => 640,
        };
        MetatileLimits {
            metatiles_primary,
            metatiles_total: 1024,
        }
    }
}

/// Metatile count limits shared by a primary/secondary tileset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetatileLimits {
    pub metatiles_primary: usize,
    pub metatiles_total: usize,
}

/// `[project]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    pub base_game: BaseGame,
    pub triple_layer_metatiles: bool,
}

/// `[tilesets]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilesetSection {
    /// Tileset labels in Advance Map index order.
    pub ordered: Vec<String>,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_secondary: Option<String>,
}

/// Root of `advmap.toml`.
///
/// # Examples
/// ```
/// use advmap_core::{ProjectConfig, TilesetSlot};
///
/// let config = ProjectConfig::from_toml_str(r#"
/// [project]
/// base_game = "pokefirered"
///
/// [tilesets]
/// ordered = ["gTileset_General", "gTileset_PalletTown"]
/// primary = ["gTileset_General"]
/// secondary = ["gTileset_PalletTown"]
/// "#)?;
/// assert_eq!(config.max_metatiles(TilesetSlot::Primary), 640);
/// assert_eq!(config.max_metatiles(TilesetSlot::Secondary), 384);
/// # Ok::<(), advmap_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub project: ProjectSection,
    /// Overrides the base game limits when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<MetatileLimits>,
    pub tilesets: TilesetSection,
}

impl ProjectConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ProjectConfig = toml::from_str(contents)?;
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(config)
    }

    /// Collect every validation problem; empty when the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let limits = self.limits();
        if limits.metatiles_total == 0 {
            errors.push("limits.metatiles_total must be greater than 0".to_string());
        }
        if limits.metatiles_primary > limits.metatiles_total {
            errors.push(format!(
                "limits.metatiles_primary ({}) exceeds limits.metatiles_total ({})",
                limits.metatiles_primary, limits.metatiles_total
            ));
        }
        for (slot, labels) in [
            (TilesetSlot::Primary, &self.tilesets.primary),
            (TilesetSlot::Secondary, &self.tilesets.secondary),
        ] {
            for label in labels {
                if !self.tilesets.ordered.contains(label) {
                    errors.push(format!(
                        "{slot} tileset '{label}' is missing from tilesets.ordered"
                    ));
                }
            }
        }
        for (slot, default, labels) in [
            (
                TilesetSlot::Primary,
                &self.tilesets.default_primary,
                &self.tilesets.primary,
            ),
            (
                TilesetSlot::Secondary,
                &self.tilesets.default_secondary,
                &self.tilesets.secondary,
            ),
        ] {
            if let Some(label) = default {
                if !labels.contains(label) {
                    errors.push(format!(
                        "tilesets.default_{slot} '{label}' is missing from tilesets.{slot}"
                    ));
                }
            }
        }
        errors
    }

    pub fn limits(&self) -> MetatileLimits {
        self.limits
            .unwrap_or_else(|| self.project.base_game.default_limits())
    }

    /// Maximum metatile count for a tileset in `slot`.
    pub fn max_metatiles(&self, slot: TilesetSlot) -> usize {
        let limits = self.limits();
        match slot {
            TilesetSlot::Primary => limits.metatiles_primary,
            TilesetSlot::Secondary => limits
                .metatiles_total
                .saturating_sub(limits.metatiles_primary),
        }
    }

    pub fn metatile_options(&self, slot: TilesetSlot) -> MetatileOptions {
        MetatileOptions::new(slot, self.max_metatiles(slot))
            .with_triple_layer(self.project.triple_layer_metatiles)
    }

    pub fn registry(&self) -> TilesetRegistry {
        TilesetRegistry::new(
            self.tilesets.ordered.clone(),
            self.tilesets.primary.clone(),
            self.tilesets.secondary.clone(),
        )
        .with_defaults(
            self.tilesets.default_primary.clone(),
            self.tilesets.default_secondary.clone(),
        )
    }
}

/// Load project configuration.
///
/// With no explicit path, `advmap.toml` in the working directory is used if
/// present; otherwise the default configuration is returned.
pub fn load_config(path: Option<&Path>) -> Result<ProjectConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(ProjectConfig::default()),
    }
}

fn find_config() -> Option<PathBuf> {
    let candidate = PathBuf::from(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ProjectConfig::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default_emerald() {
        let config = ProjectConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.project.base_game, BaseGame::Pokeemerald);
        assert_eq!(config.max_metatiles(TilesetSlot::Primary), 512);
        assert_eq!(config.max_metatiles(TilesetSlot::Secondary), 512);
        assert!(!config.metatile_options(TilesetSlot::Primary).triple_layer);
    }

    #[test]
    fn explicit_limits_override_base_game() {
        let config = ProjectConfig::from_toml_str(
            r#"
            [project]
            base_game = "pokefirered"
            triple_layer_metatiles = true

            [limits]
            metatiles_primary = 256
            metatiles_total = 768
            "#,
        )
        .unwrap();
        let options = config.metatile_options(TilesetSlot::Secondary);
        assert_eq!(options.max_metatiles, 512);
        assert!(options.triple_layer);
        assert_eq!(options.slot, TilesetSlot::Secondary);
    }

    #[test]
    fn registry_carries_defaults() {
        let config = ProjectConfig::from_toml_str(
            r#"
            [tilesets]
            ordered = ["gTileset_General", "gTileset_Building", "gTileset_Petalburg"]
            primary = ["gTileset_General", "gTileset_Building"]
            secondary = ["gTileset_Petalburg"]
            default_primary = "gTileset_Building"
            "#,
        )
        .unwrap();
        let registry = config.registry();
        assert_eq!(registry.labels_ordered.len(), 3);
        assert_eq!(registry.resolve(TilesetSlot::Primary, 2), "gTileset_Building");
    }

    #[test]
    fn validation_collects_every_problem() {
        let err = ProjectConfig::from_toml_str(
            r#"
            [limits]
            metatiles_primary = 900
            metatiles_total = 800

            [tilesets]
            primary = ["gTileset_Unknown"]
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].contains("exceeds"));
                assert!(errors[1].contains("gTileset_Unknown"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_outside_its_slot_is_rejected() {
        let err = ProjectConfig::from_toml_str(
            r#"
            [tilesets]
            ordered = ["gTileset_General", "gTileset_Petalburg"]
            primary = ["gTileset_General"]
            secondary = ["gTileset_Petalburg"]
            default_primary = "gTileset_Petalburg"
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(
                    errors,
                    vec![
                        "tilesets.default_primary 'gTileset_Petalburg' is missing from tilesets.primary"
                            .to_string()
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_base_game_is_parse_error() {
        let err = ProjectConfig::from_toml_str("[project]\nbase_game = \"pokecrystal\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
