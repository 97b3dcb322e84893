//! Test corpus: roundtrip tests with various patterns, sizes, and formats.

use enough::Unstoppable;
use zenraster::*;

fn checkerboard(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * bpp;
            if (x + y) % 2 == 0 {
                for c in 0..bpp {
                    pixels[off + c] = 200 + (c as u8 * 20);
                }
            } else {
                for c in 0..bpp {
                    pixels[off + c] = 10 + (c as u8 * 30);
                }
            }
        }
    }
    pixels
}

fn noise_pattern(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    let mut state: u32 = 0xDEAD_BEEF;
    for p in pixels.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *p = state as u8;
    }
    pixels
}

/// 8-bit palette BMP with a 256-entry table where entry `i` is
/// `(r, g, b) = (i, 255 - i, i / 2)`. `pixel_data` is written as-is.
fn palette_bmp(w: usize, h: usize, compression: u32, pixel_data: &[u8]) -> Vec<u8> {
    let off_bits = 54 + 1024u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(off_bits + pixel_data.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&off_bits.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(w as i32).to_le_bytes());
    out.extend_from_slice(&(h as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&compression.to_le_bytes());
    out.extend_from_slice(&[0u8; 20]);
    for i in 0..=255u8 {
        out.extend_from_slice(&[i / 2, 255 - i, i, 0]);
    }
    out.extend_from_slice(pixel_data);
    out
}

fn expand_palette(indices: &[u8]) -> Vec<u8> {
    indices.iter().flat_map(|&i| [i, 255 - i, i / 2]).collect()
}

/// Bottom-up RLE8 stream of `indices` (top row first), runs only.
fn rle8_stream(indices: &[u8], w: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for row in indices.chunks_exact(w).rev() {
        let mut x = 0;
        while x < w {
            let value = row[x];
            let mut n = 1;
            while x + n < w && n < 255 && row[x + n] == value {
                n += 1;
            }
            out.extend_from_slice(&[n as u8, value]);
            x += n;
        }
        out.extend_from_slice(&[0, 0]);
    }
    out.extend_from_slice(&[0, 1]);
    out
}

/// Uncompressed bottom-up 8-bit rows, padded to 4 bytes.
fn rows_8bit(indices: &[u8], w: usize) -> Vec<u8> {
    let stride = (w + 3) & !3;
    let mut out = Vec::new();
    for row in indices.chunks_exact(w).rev() {
        out.extend_from_slice(row);
        out.resize(out.len() + stride - w, 0);
    }
    out
}

// ── BMP roundtrips ───────────────────────────────────────────────────

#[test]
fn flat_bmp_roundtrip() {
    let pixels = checkerboard(10, 8, 3);
    let encoded = encode_bmp(&pixels, 10, 8, PixelFormat::Rgb8, Unstoppable).unwrap();
    let decoded = decode_bmp(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn flat_bmp_rgba_roundtrip() {
    let pixels = noise_pattern(7, 5, 4);
    let encoded = encode_bmp(&pixels, 7, 5, PixelFormat::Rgba8, Unstoppable).unwrap();
    let decoded = decode_bmp(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn bmp_roundtrip_every_padding_width() {
    for w in 1..=8 {
        let pixels = noise_pattern(w, 3, 3);
        let encoded = encode_bmp(&pixels, w as u32, 3, PixelFormat::Rgb8, Unstoppable).unwrap();
        let stride = (w * 3 + 3) & !3;
        assert_eq!(encoded.len(), 54 + stride * 3, "width {w}");
        let decoded = decode_bmp(encoded.data(), Unstoppable).unwrap();
        assert_eq!(decoded.pixels(), &pixels[..], "width {w}");
    }
}

#[test]
fn bmp_roundtrip_more_than_16_rows() {
    // crosses several cancellation checkpoints
    let pixels = noise_pattern(5, 70, 4);
    let encoded = encode_bmp(&pixels, 5, 70, PixelFormat::Rgba8, Unstoppable).unwrap();
    let decoded = decode(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.height, 70);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

// ── Palette and RLE ──────────────────────────────────────────────────

#[test]
fn rle8_matches_uncompressed_8bit() {
    let (w, h) = (37, 19);
    // long runs with noise sprinkled in
    let mut indices = checkerboard(w, h, 1);
    for (i, n) in noise_pattern(w, h, 1).into_iter().enumerate() {
        if n % 5 == 0 {
            indices[i] = n;
        }
    }

    let raw = decode_bmp(&palette_bmp(w, h, 0, &rows_8bit(&indices, w)), Unstoppable).unwrap();
    let rle = decode_bmp(&palette_bmp(w, h, 1, &rle8_stream(&indices, w)), Unstoppable).unwrap();

    let expected = expand_palette(&indices);
    assert_eq!(raw.pixels(), &expected[..]);
    assert_eq!(rle.pixels(), &expected[..]);
}

#[test]
fn rle8_long_rows_split_runs() {
    let (w, h) = (600, 2);
    let indices = vec![42u8; w * h];
    let stream = rle8_stream(&indices, w);
    // 255 + 255 + 90 per row
    assert_eq!(stream.len(), 2 * (3 * 2 + 2) + 2);
    let decoded = decode_bmp(&palette_bmp(w, h, 1, &stream), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &expand_palette(&indices)[..]);
}

// ── Edge cases ───────────────────────────────────────────────────────

#[test]
fn single_pixel_bmp() {
    let pixels = vec![42, 128, 200];
    let encoded = encode_bmp(&pixels, 1, 1, PixelFormat::Rgb8, Unstoppable).unwrap();
    let decoded = decode_bmp(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn wide_image_bmp() {
    let pixels = checkerboard(1000, 1, 3);
    let encoded = encode_bmp(&pixels, 1000, 1, PixelFormat::Rgb8, Unstoppable).unwrap();
    let decoded = decode_bmp(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn tall_image_bmp() {
    let pixels = checkerboard(1, 1000, 3);
    let encoded = encode_bmp(&pixels, 1, 1000, PixelFormat::Rgb8, Unstoppable).unwrap();
    let decoded = decode_bmp(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn every_prefix_of_a_bmp_fails_cleanly() {
    let pixels = noise_pattern(3, 3, 3);
    let encoded = encode_bmp(&pixels, 3, 3, PixelFormat::Rgb8, Unstoppable).unwrap();
    let data = encoded.data();
    for len in 0..data.len() {
        assert!(decode(&data[..len], Unstoppable).is_err(), "prefix {len}");
    }
    assert!(decode(data, Unstoppable).is_ok());
}

// ── Limits ───────────────────────────────────────────────────────────

#[test]
fn limits_max_width() {
    let encoded = encode_bmp(&[0u8; 12], 2, 2, PixelFormat::Rgb8, Unstoppable).unwrap();
    let limits = Limits {
        max_width: Some(1),
        ..Default::default()
    };
    assert!(decode_with_limits(encoded.data(), &limits, Unstoppable).is_err());
}

#[test]
fn limits_max_height() {
    let encoded = encode_bmp(&[0u8; 12], 2, 2, PixelFormat::Rgb8, Unstoppable).unwrap();
    let limits = Limits {
        max_height: Some(1),
        ..Default::default()
    };
    assert!(decode_with_limits(encoded.data(), &limits, Unstoppable).is_err());
}

#[test]
fn limits_max_memory_bmp() {
    let encoded = encode_bmp(&[0u8; 12], 2, 2, PixelFormat::Rgb8, Unstoppable).unwrap();
    let limits = Limits {
        max_memory_bytes: Some(1),
        ..Default::default()
    };
    assert!(decode_bmp_with_limits(encoded.data(), &limits, Unstoppable).is_err());
}

#[test]
fn limits_max_memory_rle() {
    let stream = rle8_stream(&[1, 1, 1, 1], 2);
    let file = palette_bmp(2, 2, 1, &stream);
    let limits = Limits {
        max_memory_bytes: Some(11),
        ..Default::default()
    };
    assert!(matches!(
        decode_bmp_with_limits(&file, &limits, Unstoppable),
        Err(DecodeError::LimitExceeded(_))
    ));
}

#[test]
fn limits_stop_oversized_rle_canvas() {
    // a few stream bytes declaring 65535x65535
    let file = palette_bmp(65535, 65535, 1, &[0, 1]);
    assert!(file.len() < 1200);
    let limits = Limits {
        max_pixels: Some(1 << 24),
        ..Default::default()
    };
    assert!(matches!(
        decode_with_limits(&file, &limits, Unstoppable),
        Err(DecodeError::LimitExceeded(_))
    ));
    let limits = Limits {
        max_memory_bytes: Some(64 << 20),
        ..Default::default()
    };
    assert!(matches!(
        decode_bmp_with_limits(&file, &limits, Unstoppable),
        Err(DecodeError::LimitExceeded(_))
    ));
}
