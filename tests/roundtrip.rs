use enough::Unstoppable;
use zenraster::*;

#[test]
fn bmp_roundtrip_rgb8() {
    let w = 3;
    let h = 2;
    let pixels = vec![
        255, 0, 0, 0, 255, 0, 0, 0, 255, // red green blue
        255, 255, 0, 0, 255, 255, 255, 0, 255, // yellow cyan magenta
    ];

    let encoded = EncodeRequest::bmp()
        .encode(&pixels, w, h, PixelFormat::Rgb8, Unstoppable)
        .unwrap();
    assert_eq!(encoded.format, ImageFormat::Bmp);
    assert_eq!(encoded.pixel_format, PixelFormat::Rgb8);

    let decoded = DecodeRequest::new(encoded.data())
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(decoded.width, w);
    assert_eq!(decoded.height, h);
    assert_eq!(decoded.format, ImageFormat::Bmp);
    assert_eq!(decoded.pixel_format, PixelFormat::Rgb8);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn bmp_roundtrip_rgba8() {
    let pixels = vec![
        255, 0, 0, 255, // red
        0, 255, 0, 128, // green semi-transparent
        0, 0, 255, 0, // blue transparent
        128, 128, 128, 255, // gray
    ];

    let encoded = encode_bmp(&pixels, 2, 2, PixelFormat::Rgba8, Unstoppable).unwrap();
    let decoded = decode(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.pixel_format, PixelFormat::Rgba8);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn bmp_header_layout() {
    // 3 pixels * 3 bytes = 9, padded to 12
    let pixels = [0u8; 18];
    let encoded = encode_bmp(&pixels, 3, 2, PixelFormat::Rgb8, Unstoppable).unwrap();
    let d = encoded.data();
    assert_eq!(d.len(), 54 + 12 * 2);
    assert_eq!(&d[0..2], b"BM");
    let u32_at = |o: usize| u32::from_le_bytes([d[o], d[o + 1], d[o + 2], d[o + 3]]);
    let u16_at = |o: usize| u16::from_le_bytes([d[o], d[o + 1]]);
    assert_eq!(u32_at(2), d.len() as u32);
    assert_eq!(u32_at(6), 0);
    assert_eq!(u32_at(10), 54);
    assert_eq!(u32_at(14), 40);
    assert_eq!(u32_at(18), 3);
    assert_eq!(u32_at(22), 2);
    assert_eq!(u16_at(26), 1);
    assert_eq!(u16_at(28), 24);
    assert_eq!(u32_at(30), 0); // compression
    assert_eq!(u32_at(34), 0); // image size
    assert_eq!(u32_at(38), 96);
    assert_eq!(u32_at(42), 96);
    assert_eq!(u32_at(46), 0);
    assert_eq!(u32_at(50), 0);
}

#[test]
fn bmp_rows_written_bottom_up_as_bgr() {
    let pixels = [
        1, 2, 3, // top
        4, 5, 6, // bottom
    ];
    let encoded = encode_bmp(&pixels, 1, 2, PixelFormat::Rgb8, Unstoppable).unwrap();
    assert_eq!(&encoded.data()[54..], &[6, 5, 4, 0, 3, 2, 1, 0]);
}

#[test]
fn bmp_32bit_has_no_row_padding() {
    let pixels = [10, 20, 30, 40];
    let encoded = encode_bmp(&pixels, 1, 1, PixelFormat::Rgba8, Unstoppable).unwrap();
    assert_eq!(encoded.len(), 58);
    assert_eq!(&encoded.data()[28..30], &32u16.to_le_bytes());
    assert_eq!(&encoded.data()[54..], &[30, 20, 10, 40]);
}

#[test]
fn bmp_encode_ignores_trailing_input() {
    let mut pixels = vec![9u8; 12];
    pixels.extend_from_slice(&[0xAA; 5]);
    let encoded = encode_bmp(&pixels, 2, 2, PixelFormat::Rgb8, Unstoppable).unwrap();
    let decoded = decode_bmp(encoded.data(), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[9u8; 12][..]);
}

#[test]
fn bmp_encode_rejects_non_8bit_formats() {
    for pf in PixelFormat::ALL {
        if matches!(pf, PixelFormat::Rgb8 | PixelFormat::Rgba8) {
            continue;
        }
        let pixels = vec![0u8; pf.bytes_per_pixel() * 4];
        match encode_bmp(&pixels, 2, 2, pf, Unstoppable) {
            Err(EncodeError::UnsupportedPixelFormat {
                format,
                requested,
                supported,
            }) => {
                assert_eq!(format, ImageFormat::Bmp);
                assert_eq!(requested, pf);
                assert_eq!(supported, encoding_supported(ImageFormat::Bmp, pf));
            }
            other => panic!("{pf:?}: expected UnsupportedPixelFormat, got {other:?}"),
        }
    }
}

#[test]
fn bmp_encode_r32f_is_unsupported() {
    let pixels = vec![0u8; 4 * 4];
    let err = encode(ImageFormat::Bmp, &pixels, 2, 2, PixelFormat::R32F, Unstoppable).unwrap_err();
    assert!(matches!(
        err,
        EncodeError::UnsupportedPixelFormat {
            requested: PixelFormat::R32F,
            supported: PixelFormat::Rgb8,
            ..
        }
    ));
}

#[test]
fn bmp_encode_huge_dimensions_with_short_input() {
    let err = BmpCodec
        .encode(&[], u32::MAX, 1, PixelFormat::Rgb8, &Unstoppable)
        .unwrap_err();
    // the input is also far too short, which is checked first
    assert!(matches!(err, EncodeError::Data(_)));
}

#[cfg(feature = "imgref")]
#[test]
fn typed_views_after_roundtrip() {
    let pixels = vec![1, 2, 3, 4, 5, 6];
    let encoded = encode_bmp(&pixels, 2, 1, PixelFormat::Rgb8, Unstoppable).unwrap();
    let decoded = decode(encoded.data(), Unstoppable).unwrap();
    let img = decoded.as_imgref::<rgb::RGB8>().unwrap();
    assert_eq!(img.width(), 2);
    assert_eq!(img.height(), 1);
    assert_eq!(img.buf()[1], rgb::RGB8::new(4, 5, 6));
    assert!(decoded.as_pixels::<rgb::RGBA8>().is_err());
    let owned = decoded.to_imgvec::<rgb::RGB8>().unwrap();
    assert_eq!(owned.buf()[0], rgb::RGB8::new(1, 2, 3));
}
