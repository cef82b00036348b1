//! Image-level encode/decode pipeline.
//!
//! Encoding runs: delta filter → vertical flip → LZSS → container assembly.
//! Decoding replays the stream and undoes the filters in reverse order.

use crate::container::{Container, ContainerError};
use crate::filter::{apply_delta, flip_rows, revert_delta};
use crate::lzss;
use crate::metadata::CanvasMetadata;
use crate::pixels::PixelBuffer;

/// Run the filters and the compressor over a pixel buffer.
///
/// Consumes the buffer: its bytes are filtered in place.
pub fn compress_pixels(pixels: PixelBuffer) -> Vec<u8> {
    let pixel_size = pixels.format().bytes_per_pixel();
    let stride = pixels.stride();
    let mut data = pixels.into_bytes();

    apply_delta(&mut data, pixel_size, stride);
    flip_rows(&mut data, stride);

    let payload = lzss::compress(&data);
    log::debug!(
        "compressed {} pixel bytes to {} ({:.1}%)",
        data.len(),
        payload.len(),
        percent(payload.len(), data.len())
    );
    payload
}

/// Encode a pixel buffer into an AKB container.
pub fn encode_image(pixels: PixelBuffer, meta: &CanvasMetadata) -> Result<Container, ContainerError> {
    let (width, height, format) = (pixels.width(), pixels.height(), pixels.format());
    let payload = compress_pixels(pixels);
    Container::assemble(meta, format, width, height, payload)
}

/// Encode straight to file bytes.
pub fn encode_to_bytes(pixels: PixelBuffer, meta: &CanvasMetadata) -> Result<Vec<u8>, ContainerError> {
    Ok(encode_image(pixels, meta)?.to_bytes())
}

/// Recover the source pixels from a container.
pub fn decode_image(container: &Container) -> Result<PixelBuffer, ContainerError> {
    let header = container.header();
    let (width, height) = header
        .rect
        .size()
        .ok_or(ContainerError::InvalidRect(header.rect))?;
    let format = header.format();
    let stride = width as usize * format.bytes_per_pixel();
    let expected = stride
        .checked_mul(height as usize)
        .ok_or(ContainerError::InvalidRect(header.rect))?;

    let mut data = lzss::decompress_exact(container.payload(), expected)?;
    flip_rows(&mut data, stride);
    revert_delta(&mut data, format.bytes_per_pixel(), stride);

    Ok(PixelBuffer::new(width, height, format, data)?)
}

/// Parse file bytes and decode the pixels.
pub fn decode_bytes(bytes: &[u8]) -> Result<(Container, PixelBuffer), ContainerError> {
    let container = Container::parse(bytes)?;
    let pixels = decode_image(&container)?;
    Ok((container, pixels))
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
