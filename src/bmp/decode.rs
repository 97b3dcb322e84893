//! BMP decoder: core and info headers, 1/4/8/16/24/32 bpp, RLE4/RLE8, and
//! BITFIELDS channel masks.
//!
//! Output rows are always top row first, whatever order the file stores
//! them in.

use alloc::string::String;
use alloc::vec::Vec;

use enough::Stop;

use super::header::{
    CORE_HEADER_LEN, Compression, CoreHeader, FILE_HEADER_LEN, FileHeader, INFO_HEADER_LEN,
    InfoHeader,
};
use super::rle;
use super::utils::{Cursor, Palette, expand_indices};
use crate::decode::{DecodeOutput, alloc_pixels};
use crate::error::DecodeError;
use crate::format::ImageFormat;
use crate::limits::Limits;
use crate::pixel::PixelFormat;

/// File header plus the smallest (core) DIB header.
const MIN_BMP_LEN: usize = FILE_HEADER_LEN + CORE_HEADER_LEN as usize;

/// BITFIELDS masks sit right after the 40 info-header fields.
const BITFIELDS_OFFSET: usize = FILE_HEADER_LEN + INFO_HEADER_LEN as usize;

fn overflow(msg: String) -> DecodeError {
    log::warn!("BMP data overflow: {msg}");
    DecodeError::BmpDataOverflow(msg)
}

fn unsupported(msg: String) -> DecodeError {
    log::warn!("unsupported BMP: {msg}");
    DecodeError::BmpUnsupported(msg)
}

fn invalid(msg: String) -> DecodeError {
    log::warn!("invalid BMP: {msg}");
    DecodeError::BmpInvalidFormat(msg)
}

// ── Parsed BMP header info ──────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub(crate) struct BmpHeader {
    pub file: FileHeader,
    pub info: InfoHeader,
    pub compression: Compression,
    pub width: u32,
    /// Absolute height; row order lives in `top_down`.
    pub height: u32,
    pub top_down: bool,
    /// Start of the colour table.
    pub palette_offset: usize,
    /// 4 (BGRX) for info headers, 3 (BGR) for core headers.
    pub palette_entry_size: usize,
}

impl BmpHeader {
    pub(crate) fn bit_count(&self) -> u16 {
        self.info.bit_count
    }

    pub(crate) fn pixel_offset(&self) -> usize {
        self.file.off_bits as usize
    }

    /// Colour table entries present in `data`, at most `2^bit_count`.
    ///
    /// The table ends at the pixel data when that starts after the header.
    pub(crate) fn palette(&self, data: &[u8]) -> Palette {
        let max_entries = 1usize << self.bit_count().min(8);
        let table_end = if self.pixel_offset() > self.palette_offset {
            self.pixel_offset().min(data.len())
        } else {
            data.len()
        };
        Palette::read(
            data.get(..table_end).unwrap_or(data),
            self.palette_offset,
            self.palette_entry_size,
            max_entries,
        )
    }

    /// File row holding output row `row`. Also maps file rows to output rows.
    pub(crate) fn flip_row(&self, row: usize) -> usize {
        if self.top_down {
            row
        } else {
            self.height as usize - 1 - row
        }
    }
}

// ── Header parsing ──────────────────────────────────────────────────

/// Parse and validate the file and DIB headers.
pub(crate) fn parse_header(data: &[u8]) -> Result<BmpHeader, DecodeError> {
    if data.len() < MIN_BMP_LEN {
        log::warn!("BMP input of {} bytes is shorter than {MIN_BMP_LEN}", data.len());
        return Err(DecodeError::BmpDataTooSmall {
            needed: MIN_BMP_LEN,
            actual: data.len(),
        });
    }

    let mut cursor = Cursor::new(data);
    let file = FileHeader::parse(&mut cursor)?;
    if file.file_size as usize > data.len() {
        return Err(overflow(alloc::format!(
            "file size {} exceeds {}-byte input",
            file.file_size,
            data.len()
        )));
    }
    if file.off_bits as usize > data.len() {
        return Err(overflow(alloc::format!(
            "pixel offset {} exceeds {}-byte input",
            file.off_bits,
            data.len()
        )));
    }

    let header_size = Cursor::at(data, FILE_HEADER_LEN)?.get_u32_le("header size")?;
    let header_end = FILE_HEADER_LEN as u64 + u64::from(header_size);
    if header_end > data.len() as u64 {
        return Err(overflow(alloc::format!(
            "{header_size}-byte DIB header exceeds {}-byte input",
            data.len()
        )));
    }

    let mut cursor = Cursor::at(data, FILE_HEADER_LEN)?;
    let (info, palette_entry_size) = if header_size >= INFO_HEADER_LEN {
        (InfoHeader::parse(&mut cursor)?, 4)
    } else if header_size >= CORE_HEADER_LEN {
        (InfoHeader::from_core(CoreHeader::parse(&mut cursor)?), 3)
    } else {
        return Err(unsupported(alloc::format!("DIB header size {header_size}")));
    };

    log::trace!(
        "BMP header: file_size={} reserved={:?} off_bits={} dib={} {}x{} planes={} bpp={} \
         compression={} size_image={} ppm={}x{} colors={}/{} palette_entry={}",
        file.file_size,
        file.reserved,
        file.off_bits,
        info.size,
        info.width,
        info.height,
        info.planes,
        info.bit_count,
        info.compression,
        info.size_image,
        info.x_pels_per_meter,
        info.y_pels_per_meter,
        info.clr_used,
        info.clr_important,
        palette_entry_size
    );

    let bit_count = info.bit_count;
    if !matches!(bit_count, 1 | 4 | 8 | 16 | 24 | 32) {
        return Err(unsupported(alloc::format!("bit depth {bit_count}")));
    }

    let compression = Compression::from_u32(info.compression)
        .ok_or_else(|| unsupported(alloc::format!("compression {}", info.compression)))?;

    let depth_ok = match compression {
        Compression::Rgb => true,
        Compression::Rle4 => bit_count == 4,
        Compression::Rle8 => bit_count == 8,
        Compression::Bitfields => matches!(bit_count, 16 | 32),
    };
    if !depth_ok {
        return Err(invalid(alloc::format!(
            "{compression:?} compression with {bit_count} bits per pixel"
        )));
    }

    let top_down = info.height < 0;
    let height = if top_down {
        info.height
            .checked_neg()
            .ok_or_else(|| invalid(alloc::format!("height {}", info.height)))?
    } else {
        info.height
    };
    if info.width <= 0 || height <= 0 {
        return Err(invalid(alloc::format!(
            "dimensions {}x{}",
            info.width,
            info.height
        )));
    }

    Ok(BmpHeader {
        file,
        info,
        compression,
        width: info.width as u32,
        height: height as u32,
        top_down,
        palette_offset: header_end as usize,
        palette_entry_size,
    })
}

// ── Full decode ─────────────────────────────────────────────────────

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, DecodeError> {
    let header = parse_header(data)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    stop.check()?;

    let (pixels, pixel_format) = match header.compression {
        Compression::Rle4 | Compression::Rle8 => {
            log::trace!("BMP: {:?} stream", header.compression);
            let pixels = rle::decode_rle(data, &header, limits, stop)?;
            (pixels, PixelFormat::Rgb8)
        }
        Compression::Bitfields => decode_bitfields(data, &header, limits, stop)?,
        Compression::Rgb => decode_uncompressed(data, &header, limits, stop)?,
    };

    DecodeOutput::new(
        pixels,
        header.width,
        header.height,
        ImageFormat::Bmp,
        pixel_format,
    )
}

/// `width * height * bpp`, the size of a top-first output buffer.
pub(crate) fn output_len(header: &BmpHeader, format: PixelFormat) -> Result<usize, DecodeError> {
    (header.width as usize)
        .checked_mul(header.height as usize)
        .and_then(|px| px.checked_mul(format.bytes_per_pixel()))
        .ok_or(DecodeError::OutOfMemory(usize::MAX))
}

// ── Row geometry ────────────────────────────────────────────────────

struct RowLayout {
    /// Bytes of pixel data in one row.
    row_bytes: usize,
    /// Row pitch, `row_bytes` rounded up to 4.
    stride: usize,
}

impl RowLayout {
    fn new(header: &BmpHeader, data_len: usize) -> Result<Self, DecodeError> {
        let too_big = || {
            overflow(alloc::format!(
                "{}x{} at {} bpp overflows row arithmetic",
                header.width,
                header.height,
                header.bit_count()
            ))
        };
        let row_bytes = (header.width as usize)
            .checked_mul(usize::from(header.bit_count()))
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(too_big)?;
        let stride = row_bytes
            .checked_add(3)
            .map(|r| r & !3)
            .ok_or_else(too_big)?;
        let required = stride
            .checked_mul(header.height as usize - 1)
            .and_then(|b| b.checked_add(row_bytes))
            .ok_or_else(too_big)?;
        let available = data_len - header.pixel_offset();
        if required > available {
            return Err(overflow(alloc::format!(
                "pixel data needs {required} bytes at offset {}, only {available} present",
                header.pixel_offset()
            )));
        }
        Ok(Self { row_bytes, stride })
    }

    /// Pixel bytes of the row that lands at output row `out_row`.
    fn source_row<'a>(
        &self,
        data: &'a [u8],
        header: &BmpHeader,
        out_row: usize,
    ) -> Result<&'a [u8], DecodeError> {
        let start = header.pixel_offset() + header.flip_row(out_row) * self.stride;
        data.get(start..start + self.row_bytes)
            .ok_or_else(|| overflow(alloc::format!("row {out_row} at offset {start}")))
    }
}

// ── Uncompressed ────────────────────────────────────────────────────

fn decode_uncompressed(
    data: &[u8],
    header: &BmpHeader,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(Vec<u8>, PixelFormat), DecodeError> {
    let rows = RowLayout::new(header, data.len())?;
    let bit_count = header.bit_count();
    let format = if bit_count == 32 {
        PixelFormat::Rgba8
    } else {
        PixelFormat::Rgb8
    };
    log::trace!("BMP: uncompressed {bit_count} bpp -> {format:?}");

    let width = header.width as usize;
    let mut pixels = alloc_pixels(output_len(header, format)?, limits)?;
    let out_stride = width * format.bytes_per_pixel();

    let palette = (bit_count <= 8).then(|| header.palette(data));
    let mut indices = if bit_count <= 8 {
        alloc_pixels(width, None)?
    } else {
        Vec::new()
    };

    for (y, dst) in pixels.chunks_exact_mut(out_stride).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let src = rows.source_row(data, header, y)?;
        match bit_count {
            32 => {
                for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
                    d.copy_from_slice(&[s[2], s[1], s[0], s[3]]);
                }
            }
            24 => {
                for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
                    d.copy_from_slice(&[s[2], s[1], s[0]]);
                }
            }
            16 => {
                // X1R5G5B5
                for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(3)) {
                    let p = u16::from_le_bytes([s[0], s[1]]);
                    d[0] = (((p & 0x7c00) >> 10) << 3) as u8;
                    d[1] = (((p & 0x03e0) >> 5) << 3) as u8;
                    d[2] = ((p & 0x001f) << 3) as u8;
                }
            }
            _ => {
                let Some(palette) = palette.as_ref() else {
                    return Err(unsupported(alloc::format!("bit depth {bit_count}")));
                };
                expand_indices(bit_count, src, &mut indices);
                for (&index, d) in indices.iter().zip(dst.chunks_exact_mut(3)) {
                    d.copy_from_slice(&palette.get(index)?.rgb());
                }
            }
        }
    }

    Ok((pixels, format))
}

// ── BITFIELDS ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChannelMask {
    shift: u32,
    mask: u32,
    bits: u32,
}

impl ChannelMask {
    pub(crate) fn new(raw: u32) -> Self {
        if raw == 0 {
            return Self {
                shift: 0,
                mask: 0,
                bits: 0,
            };
        }
        let shift = raw.trailing_zeros();
        let mask = raw >> shift;
        Self {
            shift,
            mask,
            bits: 32 - mask.leading_zeros(),
        }
    }

    pub(crate) fn bits(self) -> u32 {
        self.bits
    }

    fn extract(self, px: u32) -> u32 {
        (px >> self.shift) & self.mask
    }

    /// Only valid for masks of at most 8 bits.
    fn to_u8(self, px: u32) -> u8 {
        (self.extract(px) << (8 - self.bits)) as u8
    }

    fn to_f32(self, px: u32) -> f32 {
        if self.mask == 0 {
            0.0
        } else {
            self.extract(px) as f32 / self.mask as f32
        }
    }
}

fn read_le(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .rev()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn decode_bitfields(
    data: &[u8],
    header: &BmpHeader,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(Vec<u8>, PixelFormat), DecodeError> {
    let mut cursor = Cursor::at(data, BITFIELDS_OFFSET)?;
    let masks = [
        ChannelMask::new(cursor.get_u32_le("bitfield masks")?),
        ChannelMask::new(cursor.get_u32_le("bitfield masks")?),
        ChannelMask::new(cursor.get_u32_le("bitfield masks")?),
    ];
    let rows = RowLayout::new(header, data.len())?;

    let narrow = masks.iter().all(|m| m.bits() <= 8);
    let format = if narrow {
        PixelFormat::Rgb8
    } else {
        PixelFormat::Rgb32F
    };
    log::trace!(
        "BMP: bitfields {} bpp, channel bits {}/{}/{} -> {format:?}",
        header.bit_count(),
        masks[0].bits(),
        masks[1].bits(),
        masks[2].bits()
    );

    let src_bpp = usize::from(header.bit_count() / 8);
    let out_stride = header.width as usize * format.bytes_per_pixel();
    let mut pixels = alloc_pixels(output_len(header, format)?, limits)?;

    for (y, dst) in pixels.chunks_exact_mut(out_stride).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let src = rows.source_row(data, header, y)?;
        let src_px = src.chunks_exact(src_bpp).map(read_le);
        if narrow {
            for (px, d) in src_px.zip(dst.chunks_exact_mut(3)) {
                for (mask, c) in masks.iter().zip(d.iter_mut()) {
                    *c = mask.to_u8(px);
                }
            }
        } else {
            for (px, d) in src_px.zip(dst.chunks_exact_mut(12)) {
                for (mask, c) in masks.iter().zip(d.chunks_exact_mut(4)) {
                    c.copy_from_slice(&mask.to_f32(px).to_ne_bytes());
                }
            }
        }
    }

    Ok((pixels, format))
}
