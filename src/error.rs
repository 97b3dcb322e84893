use alloc::string::String;
use enough::StopReason;

use crate::format::ImageFormat;
use crate::pixel::PixelFormat;
use crate::stream::StreamError;

/// Errors from decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("invalid input data: {0}")]
    Data(String),

    #[error("unrecognized format magic bytes")]
    UnknownFormat,

    #[error("PNG decode failed: {0}")]
    Png(String),

    #[error("JPEG decode failed: {0}")]
    Jpeg(String),

    /// An offset or size in the file points past the end of the input.
    #[error("BMP data overflow: {0}")]
    BmpDataOverflow(String),

    /// Header size, bit depth, or compression the decoder does not handle.
    #[error("unsupported BMP variant: {0}")]
    BmpUnsupported(String),

    /// Compression/bit depth mismatch or non-positive dimensions.
    #[error("invalid BMP format: {0}")]
    BmpInvalidFormat(String),

    #[error("BMP data too small: need at least {needed} bytes, got {actual}")]
    BmpDataTooSmall { needed: usize, actual: usize },

    #[error("out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    #[error("no {0:?} codec registered")]
    CodecUnavailable(ImageFormat),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for DecodeError {
    fn from(r: StopReason) -> Self {
        DecodeError::Cancelled(r)
    }
}

/// Errors from encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("invalid input data: {0}")]
    Data(String),

    #[error("invalid pixel format")]
    InvalidFormat,

    #[error("image too large to encode: {width}x{height}")]
    ImageIsTooLarge { width: u32, height: u32 },

    #[error("unknown target format")]
    UnknownFormat,

    #[error("{format:?} cannot encode {requested:?} directly (nearest: {supported:?})")]
    UnsupportedPixelFormat {
        format: ImageFormat,
        requested: PixelFormat,
        supported: PixelFormat,
    },

    #[error("out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    #[error("PNG write failed: {0}")]
    Png(String),

    #[error("JPEG encode failed: {0}")]
    Jpeg(String),

    #[error("no {0:?} codec registered")]
    CodecUnavailable(ImageFormat),

    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for EncodeError {
    fn from(r: StopReason) -> Self {
        EncodeError::Cancelled(r)
    }
}
