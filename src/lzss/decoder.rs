// LZSS decoder.
//
// Replays the token stream against a ring buffer initialised the same way the
// encoder initialises its own: zero-filled, write cursor at N - F. No search
// structures are needed.

use super::token::{Token, TokenIter};
use super::{F, N, START};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A match token was cut off by the end of the stream.
    #[error("truncated match token at offset {offset}")]
    Truncated { offset: usize },
    /// The stream expanded past the caller's limit.
    #[error("decoded data exceeds expected length {expected}")]
    Overrun { expected: usize },
    /// The stream ended before producing the expected length.
    #[error("decoded {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

struct Window {
    ring: Vec<u8>,
    r: usize,
}

impl Window {
    fn new() -> Self {
        Self {
            ring: vec![0u8; N],
            r: START,
        }
    }

    #[inline]
    fn push(&mut self, byte: u8, out: &mut Vec<u8>) {
        out.push(byte);
        self.ring[self.r] = byte;
        self.r = (self.r + 1) & (N - 1);
    }
}

// A flag byte plus eight two-byte matches expands to at most 8 * F bytes.
fn max_expansion(len: usize) -> usize {
    len.div_ceil(17).saturating_mul(8 * F)
}

fn replay(data: &[u8], limit: Option<usize>) -> Result<Vec<u8>, DecodeError> {
    let hint = limit.unwrap_or(data.len() * 2).min(max_expansion(data.len()));
    let mut out = Vec::with_capacity(hint);
    let mut win = Window::new();

    for tok in TokenIter::new(data) {
        let tok = tok?;
        if let Some(expected) = limit
            && out.len() + tok.expanded_len() > expected
        {
            return Err(DecodeError::Overrun { expected });
        }
        match tok {
            Token::Literal(b) => win.push(b, &mut out),
            Token::Match { position, length } => {
                // Byte by byte: the source may overlap the bytes being written.
                let base = position as usize;
                for k in 0..length as usize {
                    let b = win.ring[(base + k) & (N - 1)];
                    win.push(b, &mut out);
                }
            }
        }
    }

    Ok(out)
}

/// Decompress a whole stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    replay(data, None)
}

/// Decompress a stream that must expand to exactly `expected` bytes.
pub fn decompress_exact(data: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    let out = replay(data, Some(expected))?;
    if out.len() != expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            actual: out.len(),
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
