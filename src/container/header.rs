// AKB fixed header (32 bytes, little-endian).
//
//   0  magic            "AKB " | "AKB+"
//   4  canvas width     u16
//   6  canvas height    u16
//   8  flags            u32
//  12  background color i32
//  16  rect x0, y0, x1, y1 (i32 each)

use bitflags::bitflags;

use crate::pixels::PixelFormat;

pub const MAGIC_BASIC: [u8; 4] = *b"AKB ";
pub const MAGIC_EXTENDED: [u8; 4] = *b"AKB+";

pub const HEADER_SIZE: usize = 32;

bitflags! {
    /// Header flag word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PixelFlags: u32 {
        /// 32-bit BGRA payload.
        const ALPHA = 0x8000_0000;
        /// 24-bit BGR payload.
        const OPAQUE = 0x4000_00FF;
    }
}

impl PixelFlags {
    pub fn for_format(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Bgra32 => Self::ALPHA,
            PixelFormat::Bgr24 => Self::OPAQUE,
        }
    }

    /// Payload format implied by the flags; anything without the alpha bit
    /// is read as 24-bit.
    pub fn format(self) -> PixelFormat {
        if self.contains(Self::ALPHA) {
            PixelFormat::Bgra32
        } else {
            PixelFormat::Bgr24
        }
    }
}

/// Where the image sits on the canvas (x1/y1 exclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    /// Width and height, or `None` if the rect is inverted or overflows.
    pub fn size(&self) -> Option<(u32, u32)> {
        let w = u32::try_from(self.x1.checked_sub(self.x0)?).ok()?;
        let h = u32::try_from(self.y1.checked_sub(self.y0)?).ok()?;
        Some((w, h))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
    pub flags: PixelFlags,
    pub background_color: i32,
    pub rect: Rect,
}

impl Header {
    /// Serialize the header behind `magic`.
    pub fn encode(&self, magic: [u8; 4]) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&magic);
        out[4..6].copy_from_slice(&self.width.to_le_bytes());
        out[6..8].copy_from_slice(&self.height.to_le_bytes());
        out[8..12].copy_from_slice(&self.flags.bits().to_le_bytes());
        out[12..16].copy_from_slice(&self.background_color.to_le_bytes());
        out[16..20].copy_from_slice(&self.rect.x0.to_le_bytes());
        out[20..24].copy_from_slice(&self.rect.y0.to_le_bytes());
        out[24..28].copy_from_slice(&self.rect.x1.to_le_bytes());
        out[28..32].copy_from_slice(&self.rect.y1.to_le_bytes());
        out
    }

    /// Parse the fields after the magic. The magic itself is not checked here.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        let u16_at = |o: usize| u16::from_le_bytes([bytes[o], bytes[o + 1]]);
        let i32_at =
            |o: usize| i32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);

        Self {
            width: u16_at(4),
            height: u16_at(6),
            flags: PixelFlags::from_bits_retain(i32_at(8) as u32),
            background_color: i32_at(12),
            rect: Rect {
                x0: i32_at(16),
                y0: i32_at(20),
                x1: i32_at(24),
                y1: i32_at(28),
            },
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.flags.format()
    }
}
