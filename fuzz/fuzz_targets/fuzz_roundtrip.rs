#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::*;

fuzz_target!(|data: &[u8]| {
    // Whatever decodes to 8-bit RGB(A) must survive a BMP re-encode unchanged
    let Ok(decoded) = decode_bmp(data, enough::Unstoppable) else {
        return;
    };
    if !matches!(decoded.pixel_format, PixelFormat::Rgb8 | PixelFormat::Rgba8) {
        // wide BITFIELDS output is f32, which BMP cannot write back
        return;
    }
    assert_eq!(decoded.pixels().len(), decoded.row_stride() * decoded.height as usize);

    let Ok(reencoded) = encode_bmp(
        decoded.pixels(),
        decoded.width,
        decoded.height,
        decoded.pixel_format,
        enough::Unstoppable,
    ) else {
        return;
    };
    let Ok(decoded2) = decode(reencoded.data(), enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
    assert_eq!(decoded.pixel_format, decoded2.pixel_format);
});
