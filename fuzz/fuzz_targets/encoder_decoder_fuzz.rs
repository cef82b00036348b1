#![no_main]
use akbtool::codec;
use akbtool::metadata::CanvasMetadata;
use akbtool::pixels::{PixelBuffer, PixelFormat};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let format = if data[0] & 1 == 0 {
        PixelFormat::Bgr24
    } else {
        PixelFormat::Bgra32
    };
    let width = 1 + (data[1] as u32 % 32);
    let offset_x = data[2] as i8 as i32;
    let offset_y = data[3] as i8 as i32;
    let pixels = &data[4..];

    let row = width as usize * format.bytes_per_pixel();
    let height = (pixels.len() / row) as u32;
    if height == 0 {
        return;
    }
    let img = PixelBuffer::new(width, height, format, pixels[..row * height as usize].to_vec()).unwrap();

    let meta = CanvasMetadata {
        offset_x,
        offset_y,
        ..CanvasMetadata::for_source(width, height)
    };
    let bytes = codec::encode_to_bytes(img.clone(), &meta).unwrap();
    let (_, decoded) = codec::decode_bytes(&bytes).unwrap();
    assert_eq!(decoded, img);
});
