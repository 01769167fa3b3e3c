use super::layout;
use crate::Color;
use crate::formats::common::reader::ByteReader;
use crate::formats::error::DecodeError;

/// Decode a raw Advance Map palette.
///
/// # Examples
/// ```
/// use advmap_core::{Color, decode_palette};
///
/// let colors = decode_palette(&[0x10, 0x20, 0x30, 0xFF])?;
/// assert_eq!(colors, vec![Color { red: 0x10, green: 0x20, blue: 0x30 }]);
/// # Ok::<(), advmap_core::DecodeError>(())
/// ```
pub fn decode_palette(bytes: &[u8]) -> Result<Vec<Color>, DecodeError> {
    if bytes.len() % layout::COLOR_SIZE != 0 {
        return Err(DecodeError::malformed(
            bytes.len(),
            format!(
                "palette length must be a multiple of {}",
                layout::COLOR_SIZE
            ),
        ));
    }

    let reader = ByteReader::new(bytes);
    (0..bytes.len() / layout::COLOR_SIZE)
        .map(|index| {
            let base = index * layout::COLOR_SIZE;
            Ok(Color {
                red: reader.read_u8(base + layout::RED_OFFSET)?,
                green: reader.read_u8(base + layout::GREEN_OFFSET)?,
                blue: reader.read_u8(base + layout::BLUE_OFFSET)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::decode_palette;
    use crate::Color;
    use crate::formats::error::DecodeError;

    #[test]
    fn decodes_colors_in_order_ignoring_fourth_byte() {
        let bytes = [255, 0, 0, 9, 0, 255, 0, 9, 0, 0, 255, 9];
        let colors = decode_palette(&bytes).unwrap();
        assert_eq!(
            colors,
            vec![
                Color { red: 255, green: 0, blue: 0 },
                Color { red: 0, green: 255, blue: 0 },
                Color { red: 0, green: 0, blue: 255 },
            ]
        );
    }

    #[test]
    fn empty_palette_is_empty_list() {
        assert!(decode_palette(&[]).unwrap().is_empty());
    }

    #[test]
    fn length_not_multiple_of_four_is_malformed() {
        let err = decode_palette(&[0u8; 6]).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedSize { length: 6, .. }));
        assert!(err.to_string().contains("multiple of 4"));
    }

    #[test]
    fn any_content_decodes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let colors = decode_palette(&bytes).unwrap();
        assert_eq!(colors.len(), 64);
        assert_eq!(colors[63], Color { red: 252, green: 253, blue: 254 });
    }
}
