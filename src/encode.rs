use alloc::vec::Vec;

use enough::Stop;

use crate::codec::{BUILTIN_CODECS, Codecs};
use crate::error::EncodeError;
use crate::format::ImageFormat;
use crate::pixel::PixelFormat;

/// Number of input bytes an image of this shape occupies.
///
/// Zero-sized images, arithmetic overflow, and short buffers are all
/// [`EncodeError::Data`].
pub(crate) fn required_input_len(
    pixels: &[u8],
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
) -> Result<usize, EncodeError> {
    if pixel_format == PixelFormat::Invalid {
        return Err(EncodeError::InvalidFormat);
    }
    let needed = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(pixel_format.bytes_per_pixel()))
        .ok_or_else(|| {
            EncodeError::Data(alloc::format!(
                "{width}x{height} {pixel_format:?} overflows the address space"
            ))
        })?;
    if needed == 0 {
        return Err(EncodeError::Data(alloc::format!(
            "{width}x{height} image has no pixels"
        )));
    }
    if pixels.len() < needed {
        return Err(EncodeError::Data(alloc::format!(
            "{width}x{height} {pixel_format:?} needs {needed} bytes, got {}",
            pixels.len()
        )));
    }
    Ok(needed)
}

/// Encoded image bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOutput {
    data: Vec<u8>,
    pub format: ImageFormat,
    /// Pixel format the encoder consumed.
    pub pixel_format: PixelFormat,
}

impl EncodeOutput {
    pub fn new(data: Vec<u8>, format: ImageFormat, pixel_format: PixelFormat) -> Self {
        Self {
            data,
            format,
            pixel_format,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for EncodeOutput {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Encode request builder.
#[derive(Clone, Copy, Debug)]
pub struct EncodeRequest<'a> {
    format: ImageFormat,
    codecs: Option<&'a Codecs>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            codecs: None,
        }
    }

    /// Encode as uncompressed BMP.
    pub fn bmp() -> Self {
        Self::new(ImageFormat::Bmp)
    }

    /// Encode as PNG through a registered collaborator codec.
    pub fn png() -> Self {
        Self::new(ImageFormat::Png)
    }

    /// Encode as JPEG through a registered collaborator codec.
    pub fn jpeg() -> Self {
        Self::new(ImageFormat::Jpeg)
    }

    pub fn with_codecs(mut self, codecs: &'a Codecs) -> Self {
        self.codecs = Some(codecs);
        self
    }

    /// Encode `pixels` (top row first, tightly packed).
    ///
    /// The pixel format is not converted: formats the target cannot write
    /// directly fail with [`EncodeError::UnsupportedPixelFormat`]. Use
    /// [`crate::encoding_supported`] to pick one up front.
    pub fn encode(
        self,
        pixels: &[u8],
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        stop: impl Stop,
    ) -> Result<EncodeOutput, EncodeError> {
        required_input_len(pixels, width, height, pixel_format)?;
        if self.format == ImageFormat::Unknown {
            return Err(EncodeError::UnknownFormat);
        }
        let codec = self
            .codecs
            .unwrap_or(&BUILTIN_CODECS)
            .get(self.format)
            .ok_or(EncodeError::CodecUnavailable(self.format))?;
        log::trace!(
            "encoding {width}x{height} {pixel_format:?} as {:?}",
            self.format
        );
        codec.encode(pixels, width, height, pixel_format, &stop)
    }
}
