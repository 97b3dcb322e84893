/// Numeric type of a single channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelType {
    U8,
    U16,
    U32,
    F32,
}

impl ChannelType {
    /// Size of one channel in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

/// Canonical in-memory pixel layout.
///
/// Multi-byte channels are stored in native endianness. `Invalid` is the
/// "no such format" answer of [`crate::encoding_supported`] and never
/// describes a real buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Invalid,
    /// 1 byte per pixel, u8.
    R8,
    /// 2 bytes per pixel, u8.
    Rg8,
    /// 3 bytes per pixel, u8.
    Rgb8,
    /// 4 bytes per pixel, u8.
    Rgba8,
    /// 2 bytes per pixel, u16.
    R16,
    /// 4 bytes per pixel, u16.
    Rg16,
    /// 6 bytes per pixel, u16.
    Rgb16,
    /// 8 bytes per pixel, u16.
    Rgba16,
    /// 4 bytes per pixel, u32.
    R32,
    /// 8 bytes per pixel, u32.
    Rg32,
    /// 12 bytes per pixel, u32.
    Rgb32,
    /// 16 bytes per pixel, u32.
    Rgba32,
    /// 4 bytes per pixel, f32.
    R32F,
    /// 8 bytes per pixel, f32.
    Rg32F,
    /// 12 bytes per pixel, f32.
    Rgb32F,
    /// 16 bytes per pixel, f32.
    Rgba32F,
}

impl PixelFormat {
    /// Every concrete (non-`Invalid`) format.
    pub const ALL: [PixelFormat; 16] = [
        Self::R8,
        Self::Rg8,
        Self::Rgb8,
        Self::Rgba8,
        Self::R16,
        Self::Rg16,
        Self::Rgb16,
        Self::Rgba16,
        Self::R32,
        Self::Rg32,
        Self::Rgb32,
        Self::Rgba32,
        Self::R32F,
        Self::Rg32F,
        Self::Rgb32F,
        Self::Rgba32F,
    ];

    /// Bytes per pixel for this format. `Invalid` has zero.
    pub fn bytes_per_pixel(self) -> usize {
        match self.channel_type() {
            Some(ty) => ty.size() * self.channels(),
            None => 0,
        }
    }

    /// Number of channels. `Invalid` has zero.
    pub fn channels(self) -> usize {
        match self {
            Self::Invalid => 0,
            Self::R8 | Self::R16 | Self::R32 | Self::R32F => 1,
            Self::Rg8 | Self::Rg16 | Self::Rg32 | Self::Rg32F => 2,
            Self::Rgb8 | Self::Rgb16 | Self::Rgb32 | Self::Rgb32F => 3,
            Self::Rgba8 | Self::Rgba16 | Self::Rgba32 | Self::Rgba32F => 4,
        }
    }

    pub fn channel_type(self) -> Option<ChannelType> {
        match self {
            Self::Invalid => None,
            Self::R8 | Self::Rg8 | Self::Rgb8 | Self::Rgba8 => Some(ChannelType::U8),
            Self::R16 | Self::Rg16 | Self::Rgb16 | Self::Rgba16 => Some(ChannelType::U16),
            Self::R32 | Self::Rg32 | Self::Rgb32 | Self::Rgba32 => Some(ChannelType::U32),
            Self::R32F | Self::Rg32F | Self::Rgb32F | Self::Rgba32F => Some(ChannelType::F32),
        }
    }

    /// Whether the fourth channel is alpha.
    pub fn has_alpha(self) -> bool {
        self.channels() == 4
    }

    /// The 8-bit integer format with the same channel count.
    pub(crate) fn to_u8_equivalent(self) -> PixelFormat {
        match self.channels() {
            1 => Self::R8,
            2 => Self::Rg8,
            3 => Self::Rgb8,
            4 => Self::Rgba8,
            _ => Self::Invalid,
        }
    }
}

/// Pixel types that [`crate::DecodeOutput::as_pixels`] can reinterpret into.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    fn pixel_format() -> PixelFormat;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGB8 {
    fn pixel_format() -> PixelFormat {
        PixelFormat::Rgb8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGBA8 {
    fn pixel_format() -> PixelFormat {
        PixelFormat::Rgba8
    }
}
