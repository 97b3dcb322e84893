//! BMP encoder: uncompressed 24-bit and 32-bit BMP.

use alloc::vec::Vec;

use enough::Stop;

use super::header::{
    Compression, DEFAULT_PPM, FileHeader, HEADERS_LEN, INFO_HEADER_LEN, InfoHeader,
};
use crate::compat::encoding_supported;
use crate::encode::{EncodeOutput, required_input_len};
use crate::error::EncodeError;
use crate::format::ImageFormat;
use crate::pixel::PixelFormat;

/// Encode RGB8 or RGBA8 pixels, top row first, to a bottom-up BMP.
pub(crate) fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    stop: &dyn Stop,
) -> Result<EncodeOutput, EncodeError> {
    let supported = encoding_supported(ImageFormat::Bmp, pixel_format);
    if supported != pixel_format {
        log::warn!("BMP cannot encode {pixel_format:?}, nearest is {supported:?}");
        return Err(EncodeError::UnsupportedPixelFormat {
            format: ImageFormat::Bmp,
            requested: pixel_format,
            supported,
        });
    }

    let expected = required_input_len(pixels, width, height, pixel_format)?;
    let (Ok(header_width), Ok(header_height)) = (i32::try_from(width), i32::try_from(height))
    else {
        return Err(EncodeError::ImageIsTooLarge { width, height });
    };

    let w = width as usize;
    let h = height as usize;
    let bpp = pixel_format.bytes_per_pixel();
    let row_bytes = w * bpp;
    let row_stride = row_bytes
        .checked_add(3)
        .map(|r| r & !3)
        .ok_or(EncodeError::ImageIsTooLarge { width, height })?;
    let pixel_data_size = row_stride
        .checked_mul(h)
        .ok_or(EncodeError::ImageIsTooLarge { width, height })?;
    let file_size = pixel_data_size
        .checked_add(HEADERS_LEN as usize)
        .ok_or(EncodeError::ImageIsTooLarge { width, height })?;
    let file_size_field =
        u32::try_from(file_size).map_err(|_| EncodeError::ImageIsTooLarge { width, height })?;

    stop.check()?;

    let mut out = Vec::new();
    out.try_reserve_exact(file_size)
        .map_err(|_| EncodeError::OutOfMemory(file_size))?;

    FileHeader {
        file_size: file_size_field,
        reserved: [0, 0],
        off_bits: HEADERS_LEN,
    }
    .write(&mut out);
    InfoHeader {
        size: INFO_HEADER_LEN,
        width: header_width,
        // positive = bottom-up
        height: header_height,
        planes: 1,
        bit_count: (bpp * 8) as u16,
        compression: Compression::Rgb.to_u32(),
        size_image: 0,
        x_pels_per_meter: DEFAULT_PPM,
        y_pels_per_meter: DEFAULT_PPM,
        clr_used: 0,
        clr_important: 0,
    }
    .write(&mut out);

    let pad_bytes = row_stride - row_bytes;
    let pixels = &pixels[..expected];
    for (i, row) in pixels.chunks_exact(row_bytes).rev().enumerate() {
        if i % 16 == 0 {
            stop.check()?;
        }
        if bpp == 4 {
            for px in row.chunks_exact(4) {
                out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        } else {
            for px in row.chunks_exact(3) {
                out.extend_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    log::trace!(
        "BMP: encoded {width}x{height} {pixel_format:?} into {} bytes",
        out.len()
    );
    Ok(EncodeOutput::new(out, ImageFormat::Bmp, pixel_format))
}
