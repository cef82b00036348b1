// Integration tests for the encode pipeline.
//
// Covers the LZSS stream properties, the delta filter inverse, and
// whole-container layout for basic and extended files.

use akbtool::codec;
use akbtool::container::{Container, ContainerError, HEADER_SIZE, NameDecoding, Rect};
use akbtool::filter::{apply_delta, flip_rows, revert_delta};
use akbtool::lzss::{self, F, N, Token, TokenIter};
use akbtool::metadata::CanvasMetadata;
use akbtool::pixels::{PixelBuffer, PixelFormat};
use std::cell::RefCell;
use std::sync::Once;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn generate_data(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        data.push((state >> 33) as u8);
    }
    data
}

/// Smooth gradient with a little noise, roughly like painted artwork.
fn gradient_image(width: u32, height: u32, format: PixelFormat) -> PixelBuffer {
    let bpp = format.bytes_per_pixel();
    let noise = generate_data((width * height) as usize, 7);
    let mut data = Vec::with_capacity((width * height) as usize * bpp);
    for y in 0..height {
        for x in 0..width {
            let n = noise[(y * width + x) as usize] & 0x03;
            data.push((x * 2) as u8 ^ n);
            data.push((y * 3) as u8);
            data.push(((x + y) / 2) as u8);
            if bpp == 4 {
                data.push(0xFF);
            }
        }
    }
    PixelBuffer::new(width, height, format, data).unwrap()
}

thread_local! {
    static WARNINGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

struct WarnRecorder;

impl log::Log for WarnRecorder {
    fn enabled(&self, meta: &log::Metadata<'_>) -> bool {
        meta.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record<'_>) {
        if record.level() == log::Level::Warn {
            WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Run `f` and return the warnings it logged on this thread.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    static INSTALL: Once = Once::new();
    static RECORDER: WarnRecorder = WarnRecorder;
    INSTALL.call_once(|| {
        let _ = log::set_logger(&RECORDER);
        log::set_max_level(log::LevelFilter::Warn);
    });
    WARNINGS.with(|w| w.borrow_mut().clear());
    let out = f();
    (out, WARNINGS.with(|w| w.take()))
}

fn tokens(stream: &[u8]) -> Vec<Token> {
    TokenIter::new(stream)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

// ---------------------------------------------------------------------------
// LZSS stream properties
// ---------------------------------------------------------------------------

#[test]
fn empty_input_compresses_to_nothing() {
    assert!(lzss::compress(&[]).is_empty());
}

#[test]
fn compression_is_deterministic() {
    let data = generate_data(20_000, 99);
    assert_eq!(lzss::compress(&data), lzss::compress(&data));
}

#[test]
fn short_distinct_input_is_all_literals() {
    for len in 1..F {
        let input: Vec<u8> = (0..len as u8).map(|b| b.wrapping_mul(37).wrapping_add(1)).collect();
        let stream = lzss::compress(&input);
        let toks = tokens(&stream);
        assert_eq!(toks.len(), len);
        assert!(toks.iter().all(|t| matches!(t, Token::Literal(_))));
        // One flag byte per started group of eight.
        assert_eq!(stream.len(), len + len.div_ceil(8));
    }
}

#[test]
fn repetitive_input_is_dominated_by_matches() {
    let input = vec![0x41u8; 5000];
    let stream = lzss::compress(&input);
    assert!(stream.len() < 700, "stream is {} bytes", stream.len());

    let toks = tokens(&stream);
    let matches = toks
        .iter()
        .filter(|t| matches!(t, Token::Match { .. }))
        .count();
    assert!(matches > toks.len() - matches);

    for t in &toks {
        if let Token::Match { position, length } = *t {
            assert!((position as usize) < N);
            assert!((3..=F as u8).contains(&length));
        }
    }
    assert_eq!(toks.iter().map(Token::expanded_len).sum::<usize>(), input.len());
    assert_eq!(lzss::decompress(&stream).unwrap(), input);
}

#[test]
fn random_data_roundtrips() {
    for (size, seed) in [(1usize, 1u64), (4095, 2), (4096, 3), (4097, 4), (50_000, 5)] {
        let data = generate_data(size, seed);
        let stream = lzss::compress(&data);
        assert_eq!(lzss::decompress(&stream).unwrap(), data, "size {size}");
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn delta_filter_inverse_restores_buffer() {
    for (w, h, bpp) in [(1u32, 1u32, 3usize), (5, 3, 3), (4, 7, 4), (31, 17, 4)] {
        let orig = generate_data((w * h) as usize * bpp, (w * h) as u64);
        let stride = w as usize * bpp;
        let mut buf = orig.clone();
        apply_delta(&mut buf, bpp, stride);
        revert_delta(&mut buf, bpp, stride);
        assert_eq!(buf, orig, "{w}x{h}x{bpp}");
    }
}

#[test]
fn flip_after_delta_matches_pipeline_payload() {
    let img = gradient_image(16, 9, PixelFormat::Bgr24);
    let mut expected = img.as_bytes().to_vec();
    apply_delta(&mut expected, 3, img.stride());
    flip_rows(&mut expected, img.stride());

    let payload = codec::compress_pixels(img);
    assert_eq!(lzss::decompress(&payload).unwrap(), expected);
}

// ---------------------------------------------------------------------------
// Container scenarios
// ---------------------------------------------------------------------------

#[test]
fn two_by_two_bgr_file_bytes() {
    let pixels = PixelBuffer::new(
        2,
        2,
        PixelFormat::Bgr24,
        vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
    )
    .unwrap();
    let bytes = codec::encode_to_bytes(pixels, &CanvasMetadata::for_source(2, 2)).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(b"AKB ");
    expected.extend_from_slice(&[2, 0, 2, 0]);
    expected.extend_from_slice(&0x4000_00FFu32.to_le_bytes());
    expected.extend_from_slice(&0i32.to_le_bytes());
    for v in [0i32, 0, 2, 2] {
        expected.extend_from_slice(&v.to_le_bytes());
    }
    // Filtered + flipped rows: 60 x6, then 10 20 30 30 30 30.
    expected.extend_from_slice(&[0x1D, 0x3C, 0xEE, 0xF2, 0x0A, 0x14, 0x1E, 0xF6, 0xF0]);
    assert_eq!(bytes, expected);

    let filtered = lzss::decompress(&bytes[HEADER_SIZE..]).unwrap();
    assert_eq!(filtered, [60u8, 60, 60, 60, 60, 60, 10, 20, 30, 30, 30, 30]);
}

#[test]
fn offset_expands_canvas() {
    let img = gradient_image(100, 100, PixelFormat::Bgr24);
    let meta = CanvasMetadata {
        width: 100,
        height: 100,
        offset_x: 50,
        offset_y: 50,
        ..Default::default()
    };
    let (c, warnings) = capture_warnings(|| codec::encode_image(img, &meta));
    let c = c.unwrap();
    let h = c.header();
    assert_eq!((h.width, h.height), (150, 150));
    assert_eq!(h.rect, Rect { x0: 50, y0: 50, x1: 150, y1: 150 });
    assert_eq!(
        warnings,
        vec![
            "image width is expanded: 100 -> 150".to_string(),
            "image height is expanded: 100 -> 150".to_string(),
        ]
    );
}

#[test]
fn fitting_image_logs_no_warning() {
    let img = gradient_image(20, 10, PixelFormat::Bgra32);
    let meta = CanvasMetadata {
        width: 64,
        height: 64,
        offset_x: 44,
        offset_y: 54,
        ..Default::default()
    };
    let (c, warnings) = capture_warnings(|| codec::encode_image(img, &meta));
    let c = c.unwrap();
    assert_eq!((c.header().width, c.header().height), (64, 64));
    assert!(warnings.is_empty(), "{warnings:?}");
}

#[test]
fn extended_file_roundtrip() {
    let img = gradient_image(40, 30, PixelFormat::Bgra32);
    let meta = CanvasMetadata {
        width: 640,
        height: 480,
        offset_x: 100,
        offset_y: 200,
        background_color: 0x00FF_8040,
        background_image: Some("背景01".to_string()),
    };
    let bytes = codec::encode_to_bytes(img.clone(), &meta).unwrap();
    assert_eq!(&bytes[..4], b"AKB+");
    assert_eq!(&bytes[8..12], &0x8000_0000u32.to_le_bytes());

    let (container, decoded) = codec::decode_bytes(&bytes).unwrap();
    assert_eq!(decoded, img);
    assert_eq!(container.metadata(NameDecoding::Terminated), meta);
    assert_eq!(
        container.metadata(NameDecoding::Legacy).background_image.as_deref(),
        Some("")
    );
}

#[test]
fn gradient_image_compresses() {
    let img = gradient_image(128, 64, PixelFormat::Bgr24);
    let raw = img.as_bytes().len();
    let c = codec::encode_image(img, &CanvasMetadata::for_source(128, 64)).unwrap();
    assert!(c.payload().len() < raw, "{} >= {raw}", c.payload().len());
}

#[test]
fn name_too_long_is_rejected() {
    let meta = CanvasMetadata {
        background_image: Some("x".repeat(33)),
        ..CanvasMetadata::for_source(1, 1)
    };
    let pixels = PixelBuffer::new(1, 1, PixelFormat::Bgr24, vec![1, 2, 3]).unwrap();
    assert!(matches!(
        codec::encode_image(pixels, &meta),
        Err(ContainerError::Name(_))
    ));
}

#[test]
fn parse_rejects_foreign_file() {
    let png_sig = b"\x89PNG\r\n\x1a\n0000000000000000000000000000000000";
    assert!(matches!(
        Container::parse(png_sig),
        Err(ContainerError::InvalidMagic(_))
    ));
}
