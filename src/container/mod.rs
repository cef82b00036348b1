// AKB container: 32-byte header, LZSS payload, optional 32-byte name trailer.
//
// - `header`: magic, flag word, image rect, fixed header encode/decode
// - `name`: CP932 background image name field
//
// "AKB " files end with the payload; "AKB+" files carry the background image
// name after it.

pub mod header;
pub mod name;

use std::io::{self, Write};

pub use header::{HEADER_SIZE, Header, MAGIC_BASIC, MAGIC_EXTENDED, PixelFlags, Rect};
pub use name::{BackgroundName, NAME_FIELD_LEN, NameDecoding, NameError};

use crate::lzss::DecodeError;
use crate::metadata::CanvasMetadata;
use crate::pixels::{BufferSizeError, PixelFormat};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("not a valid AKB image file (magic {0:02X?})")]
    InvalidMagic([u8; 4]),
    #[error("file too short: {len} bytes, need at least {need}")]
    TooShort { len: usize, need: usize },
    #[error("canvas {axis} {required} does not fit in 16 bits")]
    CanvasOverflow { axis: &'static str, required: i64 },
    #[error("image rect {0:?} is invalid")]
    InvalidRect(Rect),
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("pixel data: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Buffer(#[from] BufferSizeError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Canvas fitting
// ---------------------------------------------------------------------------

/// Canvas size after making room for the offset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasFit {
    pub width: u16,
    pub height: u16,
    pub rect: Rect,
    pub width_expanded: bool,
    pub height_expanded: bool,
}

/// Grow the stated canvas so the source image fits at its offset.
///
/// Expansion is not an error; it is logged as a warning.
pub fn fit_canvas(
    meta: &CanvasMetadata,
    source_width: u32,
    source_height: u32,
) -> Result<CanvasFit, ContainerError> {
    let right = meta.offset_x as i64 + source_width as i64;
    let bottom = meta.offset_y as i64 + source_height as i64;

    let (width, width_expanded) = grow("width", meta.width, right)?;
    let (height, height_expanded) = grow("height", meta.height, bottom)?;

    let rect = Rect {
        x0: meta.offset_x,
        y0: meta.offset_y,
        x1: i32::try_from(right).map_err(|_| ContainerError::CanvasOverflow {
            axis: "width",
            required: right,
        })?,
        y1: i32::try_from(bottom).map_err(|_| ContainerError::CanvasOverflow {
            axis: "height",
            required: bottom,
        })?,
    };

    Ok(CanvasFit {
        width,
        height,
        rect,
        width_expanded,
        height_expanded,
    })
}

fn grow(axis: &'static str, stated: i32, required: i64) -> Result<(u16, bool), ContainerError> {
    let expanded = required > stated as i64;
    let value = if expanded {
        log::warn!("image {axis} is expanded: {stated} -> {required}");
        required
    } else {
        stated as i64
    };
    let v = u16::try_from(value)
        .map_err(|_| ContainerError::CanvasOverflow { axis, required: value })?;
    Ok((v, expanded))
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// A complete AKB file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    /// `"AKB "`: header + payload.
    Basic { header: Header, payload: Vec<u8> },
    /// `"AKB+"`: header + payload + background image name.
    Extended {
        header: Header,
        payload: Vec<u8>,
        background: BackgroundName,
    },
}

impl Container {
    /// Build a container from metadata and an already-compressed payload.
    ///
    /// The canvas is expanded if the image does not fit at its offset, and
    /// a non-empty background image name selects the extended variant.
    pub fn assemble(
        meta: &CanvasMetadata,
        format: PixelFormat,
        source_width: u32,
        source_height: u32,
        payload: Vec<u8>,
    ) -> Result<Self, ContainerError> {
        let fit = fit_canvas(meta, source_width, source_height)?;
        let header = Header {
            width: fit.width,
            height: fit.height,
            flags: PixelFlags::for_format(format),
            background_color: meta.background_color,
            rect: fit.rect,
        };

        Ok(match meta.background_name() {
            Some(name) => Self::Extended {
                header,
                payload,
                background: BackgroundName::new(name)?,
            },
            None => Self::Basic { header, payload },
        })
    }

    /// Parse a complete file image.
    pub fn parse(bytes: &[u8]) -> Result<Self, ContainerError> {
        let Some(head) = bytes.first_chunk::<HEADER_SIZE>() else {
            if let Some(magic) = bytes.first_chunk::<4>()
                && *magic != MAGIC_BASIC
                && *magic != MAGIC_EXTENDED
            {
                return Err(ContainerError::InvalidMagic(*magic));
            }
            return Err(ContainerError::TooShort {
                len: bytes.len(),
                need: HEADER_SIZE,
            });
        };

        let magic = [head[0], head[1], head[2], head[3]];
        let header = Header::decode(head);

        match magic {
            MAGIC_BASIC => Ok(Self::Basic {
                header,
                payload: bytes[HEADER_SIZE..].to_vec(),
            }),
            MAGIC_EXTENDED => {
                let need = HEADER_SIZE + NAME_FIELD_LEN;
                if bytes.len() < need {
                    return Err(ContainerError::TooShort {
                        len: bytes.len(),
                        need,
                    });
                }
                let split = bytes.len() - NAME_FIELD_LEN;
                let mut field = [0u8; NAME_FIELD_LEN];
                field.copy_from_slice(&bytes[split..]);
                Ok(Self::Extended {
                    header,
                    payload: bytes[HEADER_SIZE..split].to_vec(),
                    background: BackgroundName::from_raw(field),
                })
            }
            other => Err(ContainerError::InvalidMagic(other)),
        }
    }

    pub fn header(&self) -> &Header {
        match self {
            Self::Basic { header, .. } | Self::Extended { header, .. } => header,
        }
    }

    /// Compressed pixel data.
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Basic { payload, .. } | Self::Extended { payload, .. } => payload,
        }
    }

    pub fn background(&self) -> Option<&BackgroundName> {
        match self {
            Self::Basic { .. } => None,
            Self::Extended { background, .. } => Some(background),
        }
    }

    pub fn magic(&self) -> [u8; 4] {
        match self {
            Self::Basic { .. } => MAGIC_BASIC,
            Self::Extended { .. } => MAGIC_EXTENDED,
        }
    }

    /// Total serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload().len() + self.background().map_or(0, |_| NAME_FIELD_LEN)
    }

    /// The three on-disk sections in file order: header, payload, name
    /// trailer (empty for `"AKB "`).
    fn parts(&self) -> ([u8; HEADER_SIZE], &[u8], &[u8]) {
        let trailer: &[u8] = match self.background() {
            Some(name) => name.as_bytes(),
            None => &[],
        };
        (self.header().encode(self.magic()), self.payload(), trailer)
    }

    /// Serialize to a writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let (head, payload, trailer) = self.parts();
        w.write_all(&head)?;
        w.write_all(payload)?;
        w.write_all(trailer)
    }

    /// Serialize to a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (head, payload, trailer) = self.parts();
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&head);
        out.extend_from_slice(payload);
        out.extend_from_slice(trailer);
        out
    }

    /// Recover sidecar metadata from the header.
    ///
    /// The offset comes from the rect origin; canvas size is the stored
    /// (already expanded) one.
    pub fn metadata(&self, names: NameDecoding) -> CanvasMetadata {
        let h = self.header();
        CanvasMetadata {
            width: i32::from(h.width),
            height: i32::from(h.height),
            offset_x: h.rect.x0,
            offset_y: h.rect.y0,
            background_color: h.background_color,
            background_image: self.background().map(|n| n.decode(names)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
