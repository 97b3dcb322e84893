use alloc::vec::Vec;

use enough::Stop;
#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::codec::{BUILTIN_CODECS, Codecs};
use crate::error::DecodeError;
use crate::format::{ImageFormat, identify_format};
use crate::limits::Limits;
use crate::pixel::{ChannelType, PixelFormat};

/// Zeroed buffer of `len` bytes, checked against `limits` first.
pub(crate) fn alloc_pixels(len: usize, limits: Option<&Limits>) -> Result<Vec<u8>, DecodeError> {
    if let Some(limits) = limits {
        limits.check_memory(len)?;
    }
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| DecodeError::OutOfMemory(len))?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Decoded image. Owns its pixels, top row first, rows tightly packed.
///
/// `pixels().len() == width * height * pixel_format.bytes_per_pixel()`
/// always holds. Float formats hold native-endian `f32` bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Container the pixels were decoded from.
    pub format: ImageFormat,
    pub pixel_format: PixelFormat,
}

impl DecodeOutput {
    /// Wrap a decoded buffer.
    ///
    /// Collaborator codecs build their results through this; a buffer whose
    /// length does not match the dimensions is rejected with
    /// [`DecodeError::Data`].
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        format: ImageFormat,
        pixel_format: PixelFormat,
    ) -> Result<Self, DecodeError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(pixel_format.bytes_per_pixel()));
        if expected != Some(pixels.len()) || pixel_format == PixelFormat::Invalid {
            return Err(DecodeError::Data(alloc::format!(
                "{}-byte buffer does not hold {width}x{height} {pixel_format:?}",
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
            format,
            pixel_format,
        })
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes in one row of pixels.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.pixel_format.bytes_per_pixel()
    }

    /// Pixel data as `f32` channels, for the float formats.
    pub fn to_f32_vec(&self) -> Option<Vec<f32>> {
        if self.pixel_format.channel_type() != Some(ChannelType::F32) {
            return None;
        }
        Some(
            self.pixels
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`DecodeError::Data`] if the pixel format doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], DecodeError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.pixel_format != P::pixel_format() {
            return Err(DecodeError::Data(alloc::format!(
                "pixels are {:?}, not {:?}",
                self.pixel_format,
                P::pixel_format()
            )));
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, DecodeError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, DecodeError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}

/// Decode request builder.
///
/// The container is identified from the data's magic bytes and routed to
/// the matching codec. BMP is built in; PNG and JPEG need a codec
/// registered through [`with_codecs`](Self::with_codecs).
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    codecs: Option<&'a Codecs>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            codecs: None,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_codecs(mut self, codecs: &'a Codecs) -> Self {
        self.codecs = Some(codecs);
        self
    }

    /// Container format the data will be decoded as.
    pub fn format(&self) -> ImageFormat {
        identify_format(self.data)
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
        if self.data.is_empty() {
            return Err(DecodeError::Data("empty input".into()));
        }
        let format = identify_format(self.data);
        if format == ImageFormat::Unknown {
            log::warn!("unrecognized magic bytes in {}-byte input", self.data.len());
            return Err(DecodeError::UnknownFormat);
        }
        let codec = self
            .codecs
            .unwrap_or(&BUILTIN_CODECS)
            .get(format)
            .ok_or(DecodeError::CodecUnavailable(format))?;
        log::trace!("decoding {} bytes as {format:?}", self.data.len());
        codec.decode(self.data, self.limits, &stop)
    }
}
