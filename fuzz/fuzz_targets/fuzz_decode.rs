#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Sniffing must never read out of bounds
    let _ = zenraster::identify_format(data);

    // Auto-detect and forced BMP decode must never panic
    let _ = zenraster::decode(data, enough::Unstoppable);
    let _ = zenraster::decode_bmp(data, enough::Unstoppable);
});
