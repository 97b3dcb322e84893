#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(file_size: u32, off_bits: u32, w: i32, h: i32, bpp: u16, compression: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(54);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&off_bits.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&w.to_le_bytes());
    out.extend_from_slice(&h.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&compression.to_le_bytes());
    out.extend_from_slice(&[0; 20]);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit
    let mut bmp = header(58, 54, 1, 1, 24, 0);
    bmp.extend_from_slice(&[0x00, 0x00, 0xff, 0x00]); // BGR + pad
    fs::write(format!("{dir}/bmp_1x1.bmp"), bmp).unwrap();

    // 2x2 top-down 32-bit
    let mut bmp = header(70, 54, 2, -2, 32, 0);
    bmp.extend_from_slice(&[0xff, 0, 0, 0xff, 0, 0xff, 0, 0x80, 0, 0, 0xff, 0, 0x80, 0x80, 0x80, 0xff]);
    fs::write(format!("{dir}/bmp_topdown_32.bmp"), bmp).unwrap();

    // 4x2 RLE8 with run, absolute, delta, and end-of-bitmap
    let stream = [4, 1, 0, 0, 0, 3, 2, 3, 2, 0, 0, 2, 1, 0, 0, 1];
    let off = 54 + 4 * 4;
    let mut bmp = header((off + stream.len()) as u32, off as u32, 4, 2, 8, 1);
    bmp.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0xff, 0, 0, 0xff, 0, 0, 0xff, 0, 0, 0]);
    bmp.extend_from_slice(&stream);
    fs::write(format!("{dir}/bmp_rle8.bmp"), bmp).unwrap();

    // 2x1 RGB565 BITFIELDS
    let mut bmp = header(54 + 12 + 4, 54 + 12, 2, 1, 16, 3);
    for mask in [0xF800u32, 0x07E0, 0x001F] {
        bmp.extend_from_slice(&mask.to_le_bytes());
    }
    bmp.extend_from_slice(&[0x00, 0xF8, 0x1F, 0x00]);
    fs::write(format!("{dir}/bmp_565.bmp"), bmp).unwrap();

    // OS/2 core header, 1-bit palette
    let mut bmp = b"BM".to_vec();
    bmp.extend_from_slice(&36u32.to_le_bytes());
    bmp.extend_from_slice(&[0; 4]);
    bmp.extend_from_slice(&32u32.to_le_bytes());
    bmp.extend_from_slice(&12u32.to_le_bytes());
    bmp.extend_from_slice(&8u16.to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes());
    bmp.extend_from_slice(&[0, 0, 0, 0xff, 0xff, 0xff]);
    bmp.extend_from_slice(&[0b1010_1010, 0, 0, 0]);
    fs::write(format!("{dir}/bmp_core_1bit.bmp"), bmp).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/png_sig.bin"), b"\x89PNG\r\n\x1a\n").unwrap();
    fs::write(format!("{dir}/jpeg_soi.bin"), b"\xff\xd8\xff\xe0").unwrap();

    println!("Generated seed corpus in {dir}/");
}
