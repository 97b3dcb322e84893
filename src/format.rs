//! Container identification from magic bytes.

/// Recommended number of leading bytes to pass to [`identify_format`].
///
/// Enough to tell PNG and JPEG apart; BMP additionally needs a full
/// 14-byte file header before it is reported.
pub const IDENTIFY_MIN_LEN: usize = 8;

const BMP_MAGIC: &[u8; 2] = b"BM";
const BMP_FILE_HEADER_LEN: usize = 14;
const PNG_SIGNATURE: &[u8; 8] = &[137, 80, 78, 71, 13, 10, 26, 10];
const JPEG_SOI: &[u8; 3] = &[0xFF, 0xD8, 0xFF];

/// Image container format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    #[default]
    Unknown,
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Png => Some("png"),
            Self::Jpeg => Some("jpg"),
            Self::Bmp => Some("bmp"),
        }
    }
}

/// Identify the container format of `data` from its leading bytes.
///
/// Checked in priority order BMP, PNG, JPEG. Never reads past the end of
/// `data`; short or empty input yields [`ImageFormat::Unknown`].
pub fn identify_format(data: &[u8]) -> ImageFormat {
    if data.len() >= BMP_FILE_HEADER_LEN && data.starts_with(BMP_MAGIC) {
        return ImageFormat::Bmp;
    }
    if data.starts_with(PNG_SIGNATURE) {
        return ImageFormat::Png;
    }
    if data.starts_with(JPEG_SOI) {
        return ImageFormat::Jpeg;
    }
    ImageFormat::Unknown
}
