//! Which pixel formats each container encoder can write directly.

use crate::format::ImageFormat;
use crate::pixel::{ChannelType, PixelFormat};

/// Nearest pixel format the encoder for `format` can produce for `requested`.
///
/// When the answer differs from `requested` the caller has to resample
/// before encoding; this function only advises. Unknown containers yield
/// [`PixelFormat::Invalid`].
pub fn encoding_supported(format: ImageFormat, requested: PixelFormat) -> PixelFormat {
    match format {
        ImageFormat::Png => match requested.channel_type() {
            Some(ChannelType::U8 | ChannelType::U16) => requested,
            Some(ChannelType::U32 | ChannelType::F32) => requested.to_u8_equivalent(),
            None => PixelFormat::Rgba8,
        },
        // grayscale or RGB only
        ImageFormat::Jpeg => {
            if requested.channels() == 1 {
                PixelFormat::R8
            } else {
                PixelFormat::Rgb8
            }
        }
        ImageFormat::Bmp => {
            if requested.has_alpha() {
                PixelFormat::Rgba8
            } else {
                PixelFormat::Rgb8
            }
        }
        ImageFormat::Unknown => PixelFormat::Invalid,
    }
}

/// Whether `requested` must be converted before `format` can encode it.
pub fn requires_resample(format: ImageFormat, requested: PixelFormat) -> bool {
    encoding_supported(format, requested) != requested
}
