//! Metatile attribute bit layouts.
//!
//! Each family packs behavior, terrain, encounter and layer information into
//! its attribute word differently. The layouts are plain `(mask, shift)`
//! tables selected by [`Family`]; decoding never branches on the family
//! beyond picking the table.

use serde::{Deserialize, Serialize};

use crate::Family;

/// A contiguous bit field inside an attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub mask: u32,
    pub shift: u32,
}

impl BitField {
    /// Field that the family does not store; always decodes to 0.
    pub const UNUSED: Self = Self::new(0, 0);

    pub const fn new(mask: u32, shift: u32) -> Self {
        Self { mask, shift }
    }

    pub const fn extract(self, raw: u32) -> u32 {
        (raw & self.mask) >> self.shift
    }
}

/// Bit layout of one family's attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    pub behavior: BitField,
    pub terrain_type: BitField,
    pub encounter_type: BitField,
    pub layer_type: BitField,
}

impl AttributeLayout {
    pub const RSE: Self = Self {
        behavior: BitField::new(0x0000_00FF, 0),
        terrain_type: BitField::UNUSED,
        encounter_type: BitField::UNUSED,
        layer_type: BitField::new(0x0000_F000, 12),
    };

    pub const FRLG: Self = Self {
        behavior: BitField::new(0x0000_01FF, 0),
        terrain_type: BitField::new(0x0000_3E00, 9),
        encounter_type: BitField::new(0x0700_0000, 24),
        layer_type: BitField::new(0x6000_0000, 29),
    };

    fn fields(&self) -> [BitField; 4] {
        [
            self.behavior,
            self.terrain_type,
            self.encounter_type,
            self.layer_type,
        ]
    }
}

impl Family {
    pub const fn attribute_layout(self) -> &'static AttributeLayout {
        match self {
            Family::Rse => &AttributeLayout::RSE,
            Family::Frlg => &AttributeLayout::FRLG,
        }
    }
}

/// Attribute fields decoded from a raw metatile attribute word.
///
/// # Examples
/// ```
/// use advmap_core::{Family, MetatileAttributes};
///
/// let decoded = MetatileAttributes::decode(0x1002, Family::Rse);
/// assert_eq!(decoded.behavior, 0x02);
/// assert_eq!(decoded.layer_type, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetatileAttributes {
    pub behavior: u32,
    pub terrain_type: u32,
    pub encounter_type: u32,
    pub layer_type: u32,
}

impl MetatileAttributes {
    pub fn decode(raw: u32, family: Family) -> Self {
        let layout = family.attribute_layout();
        Self {
            behavior: layout.behavior.extract(raw),
            terrain_type: layout.terrain_type.extract(raw),
            encounter_type: layout.encounter_type.extract(raw),
            layer_type: layout.layer_type.extract(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_do_not_overlap_and_fit_attribute_width() {
        for family in [Family::Rse, Family::Frlg] {
            let fields = family.attribute_layout().fields();
            let width_mask = match family.attributes_size() {
                4 => u32::MAX,
                size => (1u32 << (size * 8)) - 1,
            };
            let mut seen = 0u32;
            for field in fields {
                assert_eq!(seen & field.mask, 0, "{family} fields overlap");
                assert_eq!(field.mask & !width_mask, 0, "{family} field too wide");
                seen |= field.mask;
            }
        }
    }

    #[test]
    fn layouts_differ_between_families() {
        assert_ne!(AttributeLayout::RSE, AttributeLayout::FRLG);
    }

    #[test]
    fn decode_frlg_fields() {
        let raw = 0x0000_01ABu32 | (0x1F << 9) | (0x3 << 24) | (0x2 << 29);
        let decoded = MetatileAttributes::decode(raw, Family::Frlg);
        assert_eq!(decoded.behavior, 0x1AB);
        assert_eq!(decoded.terrain_type, 0x1F);
        assert_eq!(decoded.encounter_type, 0x3);
        assert_eq!(decoded.layer_type, 0x2);
    }

    #[test]
    fn decode_rse_ignores_unstored_fields() {
        let decoded = MetatileAttributes::decode(0xFFFF, Family::Rse);
        assert_eq!(decoded.behavior, 0xFF);
        assert_eq!(decoded.layer_type, 0xF);
        assert_eq!(decoded.terrain_type, 0);
        assert_eq!(decoded.encounter_type, 0);
    }
}
