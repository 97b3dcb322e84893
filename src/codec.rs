//! Codec capability and the per-format registry.
//!
//! BMP is implemented in this crate. PNG and JPEG pixel coding is left to
//! collaborator codecs that implement [`ImageCodec`] and are registered in
//! a [`Codecs`] value handed to the request builders.

use alloc::boxed::Box;
use core::fmt;

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::encode::EncodeOutput;
use crate::error::{DecodeError, EncodeError};
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::PixelFormat;

/// Decode and encode one container format.
///
/// Implementations are stateless from the caller's point of view and may be
/// shared between threads.
pub trait ImageCodec: Send + Sync {
    /// Container this codec handles.
    fn format(&self) -> ImageFormat;

    /// Decode a complete file held in memory.
    fn decode(
        &self,
        data: &[u8],
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, DecodeError>;

    /// Encode `width * height` pixels, top row first, tightly packed.
    fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        stop: &dyn Stop,
    ) -> Result<EncodeOutput, EncodeError>;
}

/// The built-in BMP codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BmpCodec;

impl ImageCodec for BmpCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Bmp
    }

    fn decode(
        &self,
        data: &[u8],
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, DecodeError> {
        crate::bmp::decode(data, limits, stop)
    }

    fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        stop: &dyn Stop,
    ) -> Result<EncodeOutput, EncodeError> {
        crate::bmp::encode(pixels, width, height, pixel_format, stop)
    }
}

static BMP: BmpCodec = BmpCodec;

/// Registry used when a request carries none: BMP only.
pub(crate) static BUILTIN_CODECS: Codecs = Codecs::new();

/// Codecs available to the dispatcher, one slot per container.
///
/// BMP is always available and may be overridden; PNG and JPEG are empty
/// until registered.
#[derive(Default)]
pub struct Codecs {
    bmp: Option<Box<dyn ImageCodec>>,
    png: Option<Box<dyn ImageCodec>>,
    jpeg: Option<Box<dyn ImageCodec>>,
}

impl Codecs {
    pub const fn new() -> Self {
        Self {
            bmp: None,
            png: None,
            jpeg: None,
        }
    }

    /// Register a PNG codec.
    pub fn with_png(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.png = Some(Box::new(codec));
        self
    }

    /// Register a JPEG codec.
    pub fn with_jpeg(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.jpeg = Some(Box::new(codec));
        self
    }

    /// Put `codec` in the slot for its [`ImageCodec::format`], returning the
    /// codec it replaced. A codec claiming [`ImageFormat::Unknown`] is handed
    /// back unregistered.
    pub fn register(&mut self, codec: Box<dyn ImageCodec>) -> Option<Box<dyn ImageCodec>> {
        let slot = match codec.format() {
            ImageFormat::Bmp => &mut self.bmp,
            ImageFormat::Png => &mut self.png,
            ImageFormat::Jpeg => &mut self.jpeg,
            ImageFormat::Unknown => return Some(codec),
        };
        slot.replace(codec)
    }

    /// Codec that handles `format`, if any.
    pub fn get(&self, format: ImageFormat) -> Option<&dyn ImageCodec> {
        match format {
            ImageFormat::Bmp => Some(self.bmp.as_deref().unwrap_or(&BMP)),
            ImageFormat::Png => self.png.as_deref(),
            ImageFormat::Jpeg => self.jpeg.as_deref(),
            ImageFormat::Unknown => None,
        }
    }

    /// Whether a codec for `format` is available.
    pub fn supports(&self, format: ImageFormat) -> bool {
        self.get(format).is_some()
    }
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codecs")
            .field("bmp_override", &self.bmp.is_some())
            .field("png", &self.png.is_some())
            .field("jpeg", &self.jpeg.is_some())
            .finish()
    }
}
