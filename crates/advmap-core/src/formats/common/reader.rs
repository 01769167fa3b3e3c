use std::ops::Range;

use crate::formats::error::DecodeError;

/// Bounds-checked little-endian access to an in-memory file.
///
/// Every read reports `DecodeError::TruncatedData` instead of panicking when
/// the requested bytes lie past the end of the buffer.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn require_len(&self, needed: u64) -> Result<(), DecodeError> {
        if (self.bytes.len() as u64) < needed {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.bytes
            .get(range.clone())
            .ok_or_else(|| self.truncated(range.end as u64))
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset as u64 + 1))
    }

    pub fn read_u16_le(&self, range: Range<usize>) -> Result<u16, DecodeError> {
        let bytes: [u8; 2] = self.read_array(range)?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u32_le(&self, range: Range<usize>) -> Result<u32, DecodeError> {
        let bytes: [u8; 4] = self.read_array(range)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a little-endian unsigned value of 1 to 4 bytes.
    pub fn read_uint_le(&self, range: Range<usize>) -> Result<u32, DecodeError> {
        let bytes = self.read_slice(range)?;
        if bytes.is_empty() || bytes.len() > 4 {
            return Err(DecodeError::malformed(
                self.bytes.len(),
                format!("cannot read a {}-byte integer", bytes.len()),
            ));
        }
        Ok(bytes
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, b)| acc | (u32::from(*b) << (8 * i))))
    }

    /// Read the last `N` bytes of the buffer.
    pub fn read_tail<const N: usize>(&self) -> Result<[u8; N], DecodeError> {
        let start = self
            .bytes
            .len()
            .checked_sub(N)
            .ok_or_else(|| self.truncated(N as u64))?;
        self.read_array(start..self.bytes.len())
    }

    /// Decode consecutive little-endian 16-bit words.
    pub fn read_u16_words(&self, range: Range<usize>) -> Result<Vec<u16>, DecodeError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() % 2 != 0 {
            return Err(DecodeError::malformed(
                self.bytes.len(),
                format!("word region of {} bytes is not 2-byte aligned", bytes.len()),
            ));
        }
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| {
            DecodeError::malformed(
                self.bytes.len(),
                format!("expected a {N}-byte field, got {} bytes", bytes.len()),
            )
        })
    }

    fn truncated(&self, needed: u64) -> DecodeError {
        DecodeError::TruncatedData {
            needed,
            actual: self.bytes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ByteReader;
    use crate::formats::error::DecodeError;

    #[test]
    fn reads_little_endian_integers() {
        let bytes = [0x34, 0x12, 0x78, 0x56, 0xAA];
        let reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u16_le(0..2).unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le(0..4).unwrap(), 0x5678_1234);
        assert_eq!(reader.read_uint_le(2..4).unwrap(), 0x5678);
        assert_eq!(reader.read_u8(4).unwrap(), 0xAA);
    }

    #[test]
    fn read_past_end_is_truncated() {
        let bytes = [0u8; 3];
        let reader = ByteReader::new(&bytes);
        let err = reader.read_u32_le(0..4).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedData {
                needed: 4,
                actual: 3
            }
        );
        assert!(matches!(
            reader.read_u8(3),
            Err(DecodeError::TruncatedData { needed: 4, .. })
        ));
    }

    #[test]
    fn read_tail_returns_last_bytes() {
        let bytes = *b"xxFRLG";
        let reader = ByteReader::new(&bytes);
        assert_eq!(&reader.read_tail::<4>().unwrap(), b"FRLG");
        assert!(ByteReader::new(&bytes[..2]).read_tail::<4>().is_err());
    }

    #[test]
    fn read_u16_words_in_order() {
        let bytes = [0x01, 0x00, 0xFF, 0x3F, 0x00];
        let reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u16_words(0..4).unwrap(), vec![0x0001, 0x3FFF]);
        assert!(reader.read_u16_words(0..3).is_err());
        assert!(reader.read_u16_words(0..0).unwrap().is_empty());
    }

    #[test]
    fn require_len_reports_needed() {
        let reader = ByteReader::new(&[0u8; 2]);
        assert!(reader.require_len(2).is_ok());
        assert!(matches!(
            reader.require_len(u64::MAX),
            Err(DecodeError::TruncatedData { needed: u64::MAX, actual: 2 })
        ));
    }
}
