use thiserror::Error;

/// Errors returned by the Advance Map decoders.
///
/// # Examples
/// ```
/// use advmap_core::DecodeError;
///
/// let err = DecodeError::TooManyMetatiles { count: 600, max: 512 };
/// assert!(err.to_string().contains("maximum number of metatiles is 512"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected size of {length} bytes: {reason}")]
    MalformedSize { length: usize, reason: String },
    #[error("too little data: expected at least {needed} bytes, but it has {actual} bytes")]
    TruncatedData { needed: u64, actual: usize },
    #[error("unsupported game type {signature:?}: last 4 bytes of file must be 'RSE ' or 'FRLG'")]
    UnsupportedFormat { signature: String },
    #[error("contains data for {count} metatiles, but the maximum number of metatiles is {max}")]
    TooManyMetatiles { count: u32, max: usize },
    #[error("contains no data for metatiles")]
    EmptyData,
}

impl DecodeError {
    pub(crate) fn malformed(length: usize, reason: impl Into<String>) -> Self {
        DecodeError::MalformedSize {
            length,
            reason: reason.into(),
        }
    }
}
