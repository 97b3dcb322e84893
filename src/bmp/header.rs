//! BMP file and DIB header records.
//!
//! All fields are little-endian and read field by field; nothing here
//! depends on struct layout.

use alloc::vec::Vec;

use super::utils::Cursor;
use crate::error::DecodeError;

pub(crate) const FILE_HEADER_LEN: usize = 14;
pub(crate) const CORE_HEADER_LEN: u32 = 12;
pub(crate) const INFO_HEADER_LEN: u32 = 40;
/// File header + BITMAPINFOHEADER, the pixel offset of every file we write.
pub(crate) const HEADERS_LEN: u32 = FILE_HEADER_LEN as u32 + INFO_HEADER_LEN;
/// Resolution written by the encoder and assumed for core headers.
pub(crate) const DEFAULT_PPM: i32 = 96;

const SIGNATURE: [u8; 2] = *b"BM";

// ── Compression enum ────────────────────────────────────────────────

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub(crate) enum Compression {
    Rgb,
    Rle8,
    Rle4,
    Bitfields,
}

impl Compression {
    pub(crate) fn from_u32(num: u32) -> Option<Self> {
        match num {
            0 => Some(Self::Rgb),
            1 => Some(Self::Rle8),
            2 => Some(Self::Rle4),
            3 => Some(Self::Bitfields),
            _ => None,
        }
    }

    pub(crate) fn to_u32(self) -> u32 {
        match self {
            Self::Rgb => 0,
            Self::Rle8 => 1,
            Self::Rle4 => 2,
            Self::Bitfields => 3,
        }
    }
}

// ── BITMAPFILEHEADER ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FileHeader {
    pub file_size: u32,
    pub reserved: [u16; 2],
    pub off_bits: u32,
}

impl FileHeader {
    pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        let signature = cursor.read_fixed_bytes::<2>("file header")?;
        if signature != SIGNATURE {
            return Err(DecodeError::BmpInvalidFormat(alloc::format!(
                "bad signature {signature:02x?}"
            )));
        }
        let file_size = cursor.get_u32_le("file header")?;
        let reserved = [
            cursor.get_u16_le("file header")?,
            cursor.get_u16_le("file header")?,
        ];
        let off_bits = cursor.get_u32_le("file header")?;
        Ok(Self {
            file_size,
            reserved,
            off_bits,
        })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&SIGNATURE);
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved[0].to_le_bytes());
        out.extend_from_slice(&self.reserved[1].to_le_bytes());
        out.extend_from_slice(&self.off_bits.to_le_bytes());
    }
}

// ── BITMAPCOREHEADER (OS/2) ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CoreHeader {
    pub size: u32,
    pub width: u16,
    pub height: u16,
    pub planes: u16,
    pub bit_count: u16,
}

impl CoreHeader {
    pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            size: cursor.get_u32_le("core header")?,
            width: cursor.get_u16_le("core header")?,
            height: cursor.get_u16_le("core header")?,
            planes: cursor.get_u16_le("core header")?,
            bit_count: cursor.get_u16_le("core header")?,
        })
    }
}

// ── BITMAPINFOHEADER ────────────────────────────────────────────────

/// Info header fields. Larger V4/V5 headers share this prefix; their
/// extra fields are not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InfoHeader {
    pub size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
}

impl InfoHeader {
    pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            size: cursor.get_u32_le("info header")?,
            width: cursor.get_i32_le("info header")?,
            height: cursor.get_i32_le("info header")?,
            planes: cursor.get_u16_le("info header")?,
            bit_count: cursor.get_u16_le("info header")?,
            compression: cursor.get_u32_le("info header")?,
            size_image: cursor.get_u32_le("info header")?,
            x_pels_per_meter: cursor.get_i32_le("info header")?,
            y_pels_per_meter: cursor.get_i32_le("info header")?,
            clr_used: cursor.get_u32_le("info header")?,
            clr_important: cursor.get_u32_le("info header")?,
        })
    }

    /// Widen a core header. Core headers carry no compression, so the
    /// result is always uncompressed.
    pub(crate) fn from_core(core: CoreHeader) -> Self {
        Self {
            size: core.size,
            width: i32::from(core.width),
            height: i32::from(core.height),
            planes: core.planes,
            bit_count: core.bit_count,
            compression: Compression::Rgb.to_u32(),
            size_image: 0,
            x_pels_per_meter: DEFAULT_PPM,
            y_pels_per_meter: DEFAULT_PPM,
            clr_used: 0,
            clr_important: 0,
        }
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.size_image.to_le_bytes());
        out.extend_from_slice(&self.x_pels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.y_pels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.clr_used.to_le_bytes());
        out.extend_from_slice(&self.clr_important.to_le_bytes());
    }
}
