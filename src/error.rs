use gif_lzw::decoder::DecodingError;
use thiserror::Error;

/// Everything that can go wrong while decoding a GIF.
#[derive(Debug, Error)]
pub enum GifError {
    /// The data doesn't start with `GIF`.
    #[error("Invalid GIF signature {0:?}.")]
    InvalidSignature(String),
    /// The version is neither `87a` nor `89a`.
    #[error("Unsupported GIF version {0:?}.")]
    UnsupportedVersion(String),
    /// A fixed size block declared another size.
    #[error("Invalid block size for {block}: expected {expected}, was {actual}.")]
    InvalidBlockSize {
        block: &'static str,
        expected: u8,
        actual: u8,
    },
    /// A block started with an unknown introducer.
    #[error("Unknown block type 0x{0:02X}.")]
    UnknownBlockType(u8),
    /// An extension block had an unknown label.
    #[error("Unknown extension type 0x{0:02X}.")]
    UnknownExtensionType(u8),
    /// A read went past the end of the data.
    #[error("Truncated data: {requested} byte(s) needed at offset {offset}, {available} available.")]
    TruncatedBuffer {
        offset: usize,
        requested: usize,
        available: usize,
    },
    /// The LZW code stream of a frame is corrupt.
    #[error("Corrupt image data: {0}")]
    Lzw(DecodingError),
    /// Reading the GIF from a source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GifError {
    /// Whether this is an unknown block or extension tag, the errors that the trailing data
    /// recovery forgives once a frame was decoded.
    pub fn is_unknown_block(&self) -> bool {
        matches!(
            self,
            GifError::UnknownBlockType(_) | GifError::UnknownExtensionType(_)
        )
    }

    /// Whether the data was cut short, either in the container or inside a code stream.
    pub fn is_truncated(&self) -> bool {
        matches!(self, GifError::TruncatedBuffer { .. })
    }

    /// Wraps an error of the code stream whose sub-blocks end at `end_offset`. A code stream
    /// that runs out of codes is reported as truncated there.
    pub(crate) fn from_lzw(error: DecodingError, end_offset: usize) -> Self {
        match error {
            DecodingError::UnexpectedEndOfData => GifError::TruncatedBuffer {
                offset: end_offset,
                requested: 1,
                available: 0,
            },
            DecodingError::Io(error) => GifError::Io(error),
            error => GifError::Lzw(error),
        }
    }
}
