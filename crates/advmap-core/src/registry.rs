use log::warn;
use serde::{Deserialize, Serialize};

/// Primary tileset label used when the registry has nothing better.
pub const FALLBACK_PRIMARY_TILESET: &str = "gTileset_General";
/// Secondary tileset label used when the registry has nothing better.
pub const FALLBACK_SECONDARY_TILESET: &str = "gTileset_Petalburg";

/// Primary or secondary tileset slot of a layout or metatile bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilesetSlot {
    Primary,
    Secondary,
}

impl std::fmt::Display for TilesetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TilesetSlot::Primary => f.write_str("primary"),
            TilesetSlot::Secondary => f.write_str("secondary"),
        }
    }
}

/// Tileset labels known to the project.
///
/// `labels_ordered` is the index space used by Advance Map; `primary_labels`
/// and `secondary_labels` say which slot each label belongs to.
///
/// # Examples
/// ```
/// use advmap_core::{TilesetRegistry, TilesetSlot};
///
/// let registry = TilesetRegistry::new(
///     vec!["gTileset_General".into(), "gTileset_Petalburg".into()],
///     vec!["gTileset_General".into()],
///     vec!["gTileset_Petalburg".into()],
/// );
/// assert_eq!(registry.resolve(TilesetSlot::Primary, 0), "gTileset_General");
/// // Index 1 names a secondary tileset, so the primary default is used.
/// assert_eq!(registry.resolve(TilesetSlot::Primary, 1), "gTileset_General");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetRegistry {
    #[serde(default)]
    pub labels_ordered: Vec<String>,
    #[serde(default)]
    pub primary_labels: Vec<String>,
    #[serde(default)]
    pub secondary_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_secondary: Option<String>,
}

impl TilesetRegistry {
    pub fn new(
        labels_ordered: Vec<String>,
        primary_labels: Vec<String>,
        secondary_labels: Vec<String>,
    ) -> Self {
        Self {
            labels_ordered,
            primary_labels,
            secondary_labels,
            default_primary: None,
            default_secondary: None,
        }
    }

    pub fn with_defaults(
        mut self,
        default_primary: Option<String>,
        default_secondary: Option<String>,
    ) -> Self {
        self.default_primary = default_primary;
        self.default_secondary = default_secondary;
        self
    }

    pub fn label_at(&self, index: u32) -> Option<&str> {
        let index = usize::try_from(index).ok()?;
        self.labels_ordered.get(index).map(String::as_str)
    }

    pub fn slot_labels(&self, slot: TilesetSlot) -> &[String] {
        match slot {
            TilesetSlot::Primary => &self.primary_labels,
            TilesetSlot::Secondary => &self.secondary_labels,
        }
    }

    pub fn contains(&self, slot: TilesetSlot, label: &str) -> bool {
        self.slot_labels(slot).iter().any(|known| known == label)
    }

    /// Default label for `slot`: the configured one, then the first label of
    /// the slot, then a hard-coded fallback.
    ///
    /// A configured default is only honoured when it belongs to `slot`.
    pub fn default_label(&self, slot: TilesetSlot) -> &str {
        let configured = match slot {
            TilesetSlot::Primary => self.default_primary.as_deref(),
            TilesetSlot::Secondary => self.default_secondary.as_deref(),
        };
        let configured = configured.filter(|label| {
            let known = self.contains(slot, label);
            if !known {
                warn!("default {slot} tileset '{label}' is not a {slot} tileset; ignoring it");
            }
            known
        });
        configured
            .or_else(|| self.slot_labels(slot).first().map(String::as_str))
            .unwrap_or(match slot {
                TilesetSlot::Primary => FALLBACK_PRIMARY_TILESET,
                TilesetSlot::Secondary => FALLBACK_SECONDARY_TILESET,
            })
    }

    /// Resolve an Advance Map tileset index for `slot`.
    ///
    /// Out-of-range indices and labels that belong to the other slot resolve
    /// to the slot default.
    pub fn resolve(&self, slot: TilesetSlot, index: u32) -> String {
        let default = self.default_label(slot);
        match self.label_at(index) {
            Some(label) if self.contains(slot, label) => label.to_string(),
            Some(label) => {
                warn!(
                    "tileset index {index} resolves to '{label}', which is not a {slot} tileset; using '{default}'"
                );
                default.to_string()
            }
            None => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FALLBACK_PRIMARY_TILESET, FALLBACK_SECONDARY_TILESET, TilesetRegistry, TilesetSlot};

    fn registry() -> TilesetRegistry {
        TilesetRegistry::new(
            vec![
                "gTileset_General".into(),
                "gTileset_Building".into(),
                "gTileset_Petalburg".into(),
                "gTileset_Rustboro".into(),
            ],
            vec!["gTileset_General".into(), "gTileset_Building".into()],
            vec!["gTileset_Petalburg".into(), "gTileset_Rustboro".into()],
        )
    }

    #[test]
    fn resolves_labels_in_their_own_slot() {
        let registry = registry();
        assert_eq!(registry.resolve(TilesetSlot::Primary, 1), "gTileset_Building");
        assert_eq!(registry.resolve(TilesetSlot::Secondary, 3), "gTileset_Rustboro");
    }

    #[test]
    fn cross_slot_label_uses_default() {
        let registry = registry();
        assert_eq!(registry.resolve(TilesetSlot::Primary, 3), "gTileset_General");
        assert_eq!(registry.resolve(TilesetSlot::Secondary, 1), "gTileset_Petalburg");
    }

    #[test]
    fn out_of_range_index_uses_default() {
        let registry = registry();
        assert_eq!(registry.resolve(TilesetSlot::Primary, 99), "gTileset_General");
        assert_eq!(registry.resolve(TilesetSlot::Secondary, u32::MAX), "gTileset_Petalburg");
    }

    #[test]
    fn configured_default_wins() {
        let registry = registry().with_defaults(Some("gTileset_Building".into()), None);
        assert_eq!(registry.resolve(TilesetSlot::Primary, 2), "gTileset_Building");
        assert_eq!(registry.default_label(TilesetSlot::Secondary), "gTileset_Petalburg");
    }

    #[test]
    fn configured_default_from_other_slot_is_ignored() {
        let registry = TilesetRegistry::new(
            vec!["gTileset_General".into(), "gTileset_Petalburg".into()],
            vec!["gTileset_General".into()],
            vec!["gTileset_Petalburg".into()],
        )
        .with_defaults(
            Some("gTileset_Petalburg".into()),
            Some("gTileset_General".into()),
        );

        let primary = registry.resolve(TilesetSlot::Primary, 1);
        assert_eq!(primary, "gTileset_General");
        assert!(registry.contains(TilesetSlot::Primary, &primary));
        assert_eq!(registry.default_label(TilesetSlot::Secondary), "gTileset_Petalburg");
    }

    #[test]
    fn unknown_configured_default_without_slot_labels_uses_fallback() {
        let registry =
            TilesetRegistry::default().with_defaults(Some("gTileset_Custom".into()), None);
        assert_eq!(registry.default_label(TilesetSlot::Primary), FALLBACK_PRIMARY_TILESET);
    }

    #[test]
    fn empty_registry_uses_fallbacks() {
        let registry = TilesetRegistry::default();
        assert_eq!(registry.resolve(TilesetSlot::Primary, 0), FALLBACK_PRIMARY_TILESET);
        assert_eq!(registry.resolve(TilesetSlot::Secondary, 0), FALLBACK_SECONDARY_TILESET);
    }
}
