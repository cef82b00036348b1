//! akbtool: AKB image container encoding/decoding in Rust.
//!
//! The crate provides:
//! - Spatial pre-filters for BGR/BGRA pixel buffers (`filter`)
//! - A ring-buffer LZSS codec with tree-based match finding (`lzss`)
//! - The AKB container format (`container`) and canvas metadata (`metadata`)
//! - The image-level pipeline tying them together (`codec`)
//! - File-oriented helpers (`io`, `image-io` feature)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use akbtool::codec;
//! use akbtool::metadata::CanvasMetadata;
//! use akbtool::pixels::{PixelBuffer, PixelFormat};
//!
//! let bgr = vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
//! let pixels = PixelBuffer::new(2, 2, PixelFormat::Bgr24, bgr).unwrap();
//! let bytes = codec::encode_to_bytes(pixels.clone(), &CanvasMetadata::for_source(2, 2)).unwrap();
//! assert_eq!(&bytes[..4], b"AKB ");
//!
//! let (_, decoded) = codec::decode_bytes(&bytes).unwrap();
//! assert_eq!(decoded, pixels);
//! ```

pub mod codec;
pub mod container;
pub mod filter;
pub mod lzss;
pub mod metadata;
pub mod pixels;

#[cfg(feature = "image-io")]
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
mod testlog;
