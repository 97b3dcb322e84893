//! RLE4 and RLE8 pixel streams.
//!
//! Escapes after a zero count byte: 0 = end of line, 1 = end of bitmap,
//! 2 = delta, 3..=255 = absolute run. Pixels outside the frame are dropped,
//! and a stream that runs out early leaves the background colour showing.

use alloc::vec::Vec;

use enough::Stop;

use super::decode::{BmpHeader, output_len};
use super::header::Compression;
use super::utils::{Cursor, Palette};
use crate::decode::alloc_pixels;
use crate::error::DecodeError;
use crate::limits::Limits;
use crate::pixel::PixelFormat;

const END_OF_LINE: u8 = 0;
const END_OF_BITMAP: u8 = 1;
const DELTA: u8 = 2;

/// RGB8 output that drops writes outside the frame.
struct Canvas<'a> {
    pixels: &'a mut [u8],
    palette: &'a Palette,
    header: &'a BmpHeader,
    width: usize,
    height: usize,
}

impl Canvas<'_> {
    fn put(&mut self, x: usize, y: usize, index: u8) -> Result<(), DecodeError> {
        if x >= self.width || y >= self.height {
            return Ok(());
        }
        let row = self.header.flip_row(y);
        let offset = (row * self.width + x) * 3;
        self.pixels[offset..offset + 3].copy_from_slice(&self.palette.get(index)?.rgb());
        Ok(())
    }
}

pub(super) fn decode_rle(
    data: &[u8],
    header: &BmpHeader,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, DecodeError> {
    let mut pixels = alloc_pixels(output_len(header, PixelFormat::Rgb8)?, limits)?;
    let palette = header.palette(data);
    let background = palette.get(0)?.rgb();
    for px in pixels.chunks_exact_mut(3) {
        px.copy_from_slice(&background);
    }

    let nibbles = header.compression == Compression::Rle4;
    // pixels per byte: delta x is stored in bytes
    let delta_scale = usize::from(8 / header.bit_count());
    let height = header.height as usize;
    let mut canvas = Canvas {
        pixels: &mut pixels,
        palette: &palette,
        header,
        width: header.width as usize,
        height,
    };

    let mut cursor = Cursor::at(data, header.pixel_offset())?;
    let (mut x, mut y) = (0usize, 0usize);
    let mut finished = false;

    while cursor.remaining() >= 2 && y < height {
        let (Some(first), Some(second)) = (cursor.next_u8(), cursor.next_u8()) else {
            break;
        };

        if first != 0 {
            let count = usize::from(first);
            let mut i = 0;
            while i < count && x < canvas.width {
                let index = if !nibbles {
                    second
                } else if i % 2 == 0 {
                    second >> 4
                } else {
                    second & 0x0f
                };
                canvas.put(x, y, index)?;
                x += 1;
                i += 1;
            }
            continue;
        }

        match second {
            END_OF_LINE => {
                x = 0;
                y += 1;
                if y % 16 == 0 {
                    stop.check()?;
                }
            }
            END_OF_BITMAP => {
                finished = true;
                break;
            }
            DELTA => {
                if cursor.remaining() >= 2 {
                    let (Some(dx), Some(dy)) = (cursor.next_u8(), cursor.next_u8()) else {
                        break;
                    };
                    x = x.saturating_add(usize::from(dx) / delta_scale);
                    y = y.saturating_add(usize::from(dy));
                    stop.check()?;
                }
            }
            n => {
                let count = usize::from(n);
                let consumed = if nibbles {
                    let mut byte = 0u8;
                    for i in 0..count {
                        let index = if i % 2 == 0 {
                            match cursor.next_u8() {
                                Some(b) => byte = b,
                                None => break,
                            }
                            byte >> 4
                        } else {
                            byte & 0x0f
                        };
                        canvas.put(x, y, index)?;
                        x = x.saturating_add(1);
                    }
                    count.div_ceil(2)
                } else {
                    for _ in 0..count {
                        let Some(index) = cursor.next_u8() else {
                            break;
                        };
                        canvas.put(x, y, index)?;
                        x = x.saturating_add(1);
                    }
                    count
                };
                // absolute runs are word aligned
                if consumed % 2 == 1 {
                    cursor.skip_saturating(1);
                }
            }
        }
    }

    if !finished && y < height {
        log::warn!(
            "BMP RLE stream ended at row {y} of {height} without end-of-bitmap marker (offset {})",
            cursor.position()
        );
    }

    Ok(pixels)
}
