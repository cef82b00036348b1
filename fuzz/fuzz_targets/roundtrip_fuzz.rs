#![no_main]
use akbtool::lzss;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let stream = lzss::compress(data);
    let decoded = lzss::decompress_exact(&stream, data.len()).unwrap();
    assert_eq!(decoded, data);
    assert_eq!(lzss::compress(data), stream);
});
