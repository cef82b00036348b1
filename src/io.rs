// File-level helpers.
//
// `create_file()`      image file (+ sidecar) -> .akb
// `extract_metadata()` .akb -> sidecar JSON
// `decode_file()`      .akb -> PNG
//
// Source images are decoded with the `image` crate; only 8-bit RGB and RGBA
// sources (24/32 bits per pixel) are accepted.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageFormat, ImageReader};

use crate::codec;
use crate::container::{Container, ContainerError, NameDecoding};
use crate::metadata::{self, CanvasMetadata, MetadataError};
use crate::pixels::{BufferSizeError, PixelBuffer, PixelFormat, UnsupportedFormatError};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `create_file()`.
#[derive(Debug, Clone)]
pub struct CreateStats {
    pub source_width: u32,
    pub source_height: u32,
    pub format: PixelFormat,
    /// Raw pixel bytes before compression.
    pub pixel_bytes: u64,
    /// Compressed payload size.
    pub payload_bytes: u64,
    /// Total container size.
    pub file_bytes: u64,
    /// Canvas as written (after any expansion).
    pub canvas_width: u16,
    pub canvas_height: u16,
    /// False when the sidecar was missing or unreadable.
    pub sidecar_used: bool,
}

/// Statistics returned by `decode_file()`.
#[derive(Debug, Clone)]
pub struct DecodeStats {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub file_bytes: u64,
    pub pixel_bytes: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Format(#[from] UnsupportedFormatError),
    #[error(transparent)]
    Buffer(#[from] BufferSizeError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> IoError + '_ {
    move |source| IoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn image_err(path: &Path) -> impl FnOnce(image::ImageError) -> IoError + '_ {
    move |source| IoError::Image {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for `create_file()`.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Sidecar to read instead of `<source>.metadata.json`.
    pub metadata_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Decode an image file into a BGR/BGRA pixel buffer.
pub fn load_pixels(path: &Path) -> Result<PixelBuffer, IoError> {
    let img = ImageReader::open(path)
        .map_err(io_err(path))?
        .with_guessed_format()
        .map_err(io_err(path))?
        .decode()
        .map_err(image_err(path))?;

    let format = PixelFormat::from_bits_per_pixel(img.color().bits_per_pixel())?;
    let (width, height) = (img.width(), img.height());
    let samples = match format {
        PixelFormat::Bgr24 => img.into_rgb8().into_raw(),
        PixelFormat::Bgra32 => img.into_rgba8().into_raw(),
    };
    Ok(PixelBuffer::from_rgb_order(width, height, format, samples)?)
}

/// Read and parse an AKB file.
pub fn read_container(path: &Path) -> Result<(Container, u64), IoError> {
    let bytes = std::fs::read(path).map_err(io_err(path))?;
    let len = bytes.len() as u64;
    Ok((Container::parse(&bytes)?, len))
}

// ---------------------------------------------------------------------------
// create_file
// ---------------------------------------------------------------------------

/// Encode `source_path` into an AKB file at `out_path`.
pub fn create_file(
    source_path: &Path,
    out_path: &Path,
    opts: &CreateOptions,
) -> Result<CreateStats, IoError> {
    let pixels = load_pixels(source_path)?;
    let (width, height, format) = (pixels.width(), pixels.height(), pixels.format());
    let pixel_bytes = pixels.as_bytes().len() as u64;

    let sidecar = opts
        .metadata_path
        .clone()
        .unwrap_or_else(|| metadata::sidecar_path(source_path));
    let (meta, sidecar_used) = metadata::load_or_default(&sidecar, width, height);

    let container = codec::encode_image(pixels, &meta)?;

    let file = File::create(out_path).map_err(io_err(out_path))?;
    let mut w = BufWriter::new(file);
    container.write_to(&mut w).map_err(io_err(out_path))?;
    w.flush().map_err(io_err(out_path))?;

    let header = container.header();
    log::info!(
        "{}: {}x{} {} -> {} ({} bytes)",
        source_path.display(),
        width,
        height,
        format,
        out_path.display(),
        container.encoded_len()
    );

    Ok(CreateStats {
        source_width: width,
        source_height: height,
        format,
        pixel_bytes,
        payload_bytes: container.payload().len() as u64,
        file_bytes: container.encoded_len() as u64,
        canvas_width: header.width,
        canvas_height: header.height,
        sidecar_used,
    })
}

// ---------------------------------------------------------------------------
// extract_metadata
// ---------------------------------------------------------------------------

/// Write the sidecar for an AKB file next to it (`<stem>.metadata.json`).
///
/// Returns the sidecar path and its contents.
pub fn extract_metadata(
    akb_path: &Path,
    names: NameDecoding,
) -> Result<(PathBuf, CanvasMetadata), IoError> {
    let (container, _) = read_container(akb_path)?;
    let meta = container.metadata(names);
    let out = metadata::sidecar_path(akb_path);
    metadata::save_sidecar(&out, &meta)?;
    Ok((out, meta))
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode an AKB file to a PNG image.
pub fn decode_file(akb_path: &Path, png_path: &Path) -> Result<DecodeStats, IoError> {
    let (container, file_bytes) = read_container(akb_path)?;
    let pixels = codec::decode_image(&container)?;
    let (width, height, format) = (pixels.width(), pixels.height(), pixels.format());

    let color = match format {
        PixelFormat::Bgr24 => ExtendedColorType::Rgb8,
        PixelFormat::Bgra32 => ExtendedColorType::Rgba8,
    };
    image::save_buffer_with_format(
        png_path,
        &pixels.to_rgb_order(),
        width,
        height,
        color,
        ImageFormat::Png,
    )
    .map_err(image_err(png_path))?;

    Ok(DecodeStats {
        width,
        height,
        format,
        file_bytes,
        pixel_bytes: pixels.as_bytes().len() as u64,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
