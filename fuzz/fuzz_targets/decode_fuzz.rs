#![no_main]
use akbtool::{codec, lzss};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must only ever produce errors, never panics.
    let _ = lzss::decompress(data);
    let _ = lzss::token::stats(data);

    if data.len() >= 2 {
        let limit = u16::from_le_bytes([data[0], data[1]]) as usize;
        let _ = lzss::decompress_exact(&data[2..], limit);
    }

    let _ = codec::decode_bytes(data);
});
