use super::layout;
use crate::formats::common::reader::ByteReader;
use crate::formats::error::DecodeError;
use crate::{Family, METATILE_TILE_COUNT, Tile};

pub struct BvdReader<'a> {
    inner: ByteReader<'a>,
}

impl<'a> BvdReader<'a> {
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

    pub fn read_signature(&self) -> Result<[u8; layout::SIGNATURE_LEN], DecodeError> {
        self.inner.read_tail()
    }

    /// Family named by the trailing signature.
    pub fn read_family(&self) -> Result<Family, DecodeError> {
        let signature = self.read_signature()?;
        match &signature {
            layout::RSE_SIGNATURE => Ok(Family::Rse),
            layout::FRLG_SIGNATURE => Ok(Family::Frlg),
            _ => Err(DecodeError::UnsupportedFormat {
                signature: String::from_utf8_lossy(&signature).into_owned(),
            }),
        }
    }

    pub fn read_count(&self) -> Result<u32, DecodeError> {
        self.inner.read_u32_le(layout::COUNT_RANGE)
    }

    /// The 8 stored tiles of the metatile starting at `offset`.
    pub fn read_tiles(&self, offset: usize) -> Result<Vec<Tile>, DecodeError> {
        let end = offset + METATILE_TILE_COUNT * layout::TILE_SIZE;
        Ok(self
            .inner
            .read_u16_words(offset..end)?
            .into_iter()
            .map(Tile::from_raw)
            .collect())
    }

    pub fn read_attributes(&self, offset: usize, family: Family) -> Result<u32, DecodeError> {
        self.inner
            .read_uint_le(offset..offset + family.attributes_size())
    }
}

#[cfg(test)]
mod tests {
    use super::BvdReader;
    use crate::Family;
    use crate::formats::error::DecodeError;

    #[test]
    fn len_and_is_empty() {
        assert!(BvdReader::new(&[]).is_empty());
        let reader = BvdReader::new(b"FRLG");
        assert_eq!(reader.len(), 4);
        assert!(!reader.is_empty());
    }

    #[test]
    fn family_from_signature() {
        assert_eq!(BvdReader::new(b"\0\0RSE ").read_family().unwrap(), Family::Rse);
        assert_eq!(BvdReader::new(b"\0\0FRLG").read_family().unwrap(), Family::Frlg);
    }

    #[test]
    fn unknown_signature_is_unsupported() {
        let err = BvdReader::new(b"\0\0XYZ ").read_family().unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedFormat {
                signature: "XYZ ".to_string()
            }
        );
    }

    #[test]
    fn attributes_width_follows_family() {
        let bytes = [0x34, 0x12, 0x78, 0x56];
        let reader = BvdReader::new(&bytes);
        assert_eq!(reader.read_attributes(0, Family::Rse).unwrap(), 0x1234);
        assert_eq!(reader.read_attributes(0, Family::Frlg).unwrap(), 0x5678_1234);
    }
}
