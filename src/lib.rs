//! # zenraster
//!
//! BMP decoder and encoder, container sniffing, and pixel-format
//! negotiation for a small raster pipeline.
//!
//! ## Supported Formats
//!
//! ### BMP (built in)
//! - Core (OS/2) and info headers, including the info prefix of V4/V5 headers
//! - 1, 4, 8 bpp palette images; 16 bpp X1R5G5B5; 24 bpp; 32 bpp with alpha
//! - RLE4 and RLE8 compression
//! - BITFIELDS channel masks, decoded to RGB8 (channels up to 8 bits) or
//!   RGB32F (wider channels)
//! - Top-down and bottom-up row order
//! - Encode of uncompressed 24-bit RGB and 32-bit RGBA
//!
//! ### PNG and JPEG (collaborators)
//! Recognized by [`identify_format`] and routed through the dispatcher, but
//! pixel coding comes from an [`ImageCodec`] you register in [`Codecs`].
//!
//! ## Pixel formats
//!
//! Decoded pixels are top row first and tightly packed. [`encoding_supported`]
//! tells which [`PixelFormat`] each container writes directly; encoders never
//! convert, so anything else is rejected with
//! [`EncodeError::UnsupportedPixelFormat`].
//!
//! ## Non-Goals
//!
//! - PNG and JPEG pixel coding
//! - Resampling between pixel formats
//! - Color management
//!
//! ## Credits
//!
//! Parts of the BMP decoder draw on [zune-bmp](https://github.com/etemesi254/zune-image)
//! by Caleb Etemesi (MIT/Apache-2.0/Zlib licensed).
//!
//! ## Usage
//!
//! ```no_run
//! use zenraster::{DecodeRequest, EncodeRequest, ImageFormat};
//! use enough::Unstoppable;
//!
//! let data: &[u8] = &[]; // your BMP bytes
//!
//! assert_eq!(zenraster::identify_format(data), ImageFormat::Unknown);
//!
//! let decoded = DecodeRequest::new(data).decode(Unstoppable)?;
//! println!("{}x{} {:?}", decoded.width, decoded.height, decoded.pixel_format);
//!
//! let target = zenraster::encoding_supported(ImageFormat::Bmp, decoded.pixel_format);
//! if target == decoded.pixel_format {
//!     let encoded = EncodeRequest::bmp().encode(
//!         decoded.pixels(),
//!         decoded.width,
//!         decoded.height,
//!         decoded.pixel_format,
//!         Unstoppable,
//!     )?;
//!     assert_eq!(&encoded.data()[..2], b"BM");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bmp;
mod codec;
mod compat;
mod decode;
mod encode;
mod error;
mod format;
mod limits;
mod pixel;
pub mod stream;

// Re-exports
pub use codec::{BmpCodec, Codecs, ImageCodec};
pub use compat::{encoding_supported, requires_resample};
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::{EncodeOutput, EncodeRequest};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::{DecodeError, EncodeError};
pub use format::{IDENTIFY_MIN_LEN, ImageFormat, identify_format};
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::{ChannelType, PixelFormat};
pub use stream::{ByteSink, ByteSource, SliceSource, StreamError};
#[cfg(feature = "std")]
pub use stream::{IoSink, IoSource};

// ── Decode ──────────────────────────────────────────────────────────

/// Decode any recognized container, auto-detected from magic bytes.
///
/// Output size follows the declared dimensions. RLE files can declare a
/// huge canvas in a few bytes, so use [`decode_with_limits`] for untrusted
/// input.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).decode(stop)
}

/// Decode with resource limits.
pub fn decode_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).with_limits(limits).decode(stop)
}

/// Decode BMP data without sniffing.
///
/// Output is RGB8, RGBA8 (32 bpp), or RGB32F (wide BITFIELDS channels).
/// RLE output is not bounded by the input size; prefer
/// [`decode_bmp_with_limits`] for untrusted input.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    bmp::decode(data, None, &stop)
}

/// Decode BMP data with resource limits.
pub fn decode_bmp_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<DecodeOutput, DecodeError> {
    bmp::decode(data, Some(limits), &stop)
}

/// Drain `source` and decode the result.
///
/// `limits.max_input_bytes` bounds how much is read; the other limits apply
/// to the decode as usual.
pub fn decode_from_source<S: ByteSource + ?Sized>(
    source: &mut S,
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Result<DecodeOutput, DecodeError> {
    let data = stream::read_all(source, limits)?;
    stop.check()?;
    let request = DecodeRequest::new(&data);
    match limits {
        Some(limits) => request.with_limits(limits).decode(stop),
        None => request.decode(stop),
    }
}

// ── Encode ──────────────────────────────────────────────────────────

/// Encode to `format` with the built-in codecs.
pub fn encode(
    format: ImageFormat,
    pixels: &[u8],
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    stop: impl Stop,
) -> Result<EncodeOutput, EncodeError> {
    EncodeRequest::new(format).encode(pixels, width, height, pixel_format, stop)
}

/// Encode RGB8 or RGBA8 pixels as BMP.
pub fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    stop: impl Stop,
) -> Result<EncodeOutput, EncodeError> {
    EncodeRequest::bmp().encode(pixels, width, height, pixel_format, stop)
}

/// Encode with `request` and write the file to `sink`.
///
/// Returns the number of bytes written.
pub fn encode_to_sink<K: ByteSink + ?Sized>(
    sink: &mut K,
    request: EncodeRequest<'_>,
    pixels: &[u8],
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    stop: impl Stop,
) -> Result<usize, EncodeError> {
    let encoded = request.encode(pixels, width, height, pixel_format, stop)?;
    sink.write_all(encoded.data())?;
    sink.flush()?;
    Ok(encoded.len())
}
