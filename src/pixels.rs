// Raw pixel buffers in AKB channel order (BGR / BGRA).

use std::fmt;

/// Pixel depths the container can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 24-bit B, G, R.
    Bgr24,
    /// 32-bit B, G, R, A.
    Bgra32,
}

impl PixelFormat {
    /// Pick a format from a source bit depth; only 24 and 32 are accepted.
    pub fn from_bits_per_pixel(bits: u16) -> Result<Self, UnsupportedFormatError> {
        match bits {
            24 => Ok(Self::Bgr24),
            32 => Ok(Self::Bgra32),
            _ => Err(UnsupportedFormatError { bits_per_pixel: bits }),
        }
    }

    pub fn bits_per_pixel(self) -> u16 {
        match self {
            Self::Bgr24 => 24,
            Self::Bgra32 => 32,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self.bits_per_pixel() as usize / 8
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bgr24 => f.write_str("BGR24"),
            Self::Bgra32 => f.write_str("BGRA32"),
        }
    }
}

/// Source image depth is neither 24 nor 32 bits per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("only 24-bit or 32-bit images are supported (got {bits_per_pixel}-bit)")]
pub struct UnsupportedFormatError {
    pub bits_per_pixel: u16,
}

/// Buffer length does not match `width * height * bytes_per_pixel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pixel buffer is {actual} bytes, {width}x{height} {format} needs {expected}")]
pub struct BufferSizeError {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub expected: usize,
    pub actual: usize,
}

/// A decoded image: `height` rows of `stride` bytes, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, BufferSizeError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(BufferSizeError {
                width,
                height,
                format,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Build a BGR(A) buffer from RGB(A) samples by swapping R and B.
    pub fn from_rgb_order(
        width: u32,
        height: u32,
        format: PixelFormat,
        mut data: Vec<u8>,
    ) -> Result<Self, BufferSizeError> {
        swap_red_blue(&mut data, format.bytes_per_pixel());
        Self::new(width, height, format, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Samples in RGB(A) order, for handing to image encoders.
    pub fn to_rgb_order(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        swap_red_blue(&mut out, self.format.bytes_per_pixel());
        out
    }
}

fn swap_red_blue(data: &mut [u8], pixel_size: usize) {
    for px in data.chunks_exact_mut(pixel_size) {
        px.swap(0, 2);
    }
}
