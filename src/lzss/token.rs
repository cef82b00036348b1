// Token-level view of a compressed LZSS stream.

use super::decoder::DecodeError;
use super::THRESHOLD;

/// One unit of a compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A raw byte.
    Literal(u8),
    /// Copy `length` bytes from ring position `position`.
    Match { position: u16, length: u8 },
}

impl Token {
    /// Number of output bytes this token expands to.
    pub fn expanded_len(&self) -> usize {
        match *self {
            Self::Literal(_) => 1,
            Self::Match { length, .. } => length as usize,
        }
    }

    /// Unpack a 2-byte match token.
    #[inline]
    pub fn from_pair(lo: u8, hi: u8) -> Self {
        let position = lo as u16 | (((hi & 0xF0) as u16) << 4);
        let length = (hi & 0x0F) + (THRESHOLD as u8 + 1);
        Self::Match { position, length }
    }
}

/// Iterator over the tokens of a compressed stream.
///
/// Stops cleanly at the end of input; a group may end early. A match flag
/// with only one trailing byte left is reported as [`DecodeError::Truncated`].
pub struct TokenIter<'a> {
    data: &'a [u8],
    pos: usize,
    flags: u16,
}

impl<'a> TokenIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            flags: 0,
        }
    }

    /// Bytes of the stream consumed so far.
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl Iterator for TokenIter<'_> {
    type Item = Result<Token, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        // The high byte counts remaining units in the current group.
        self.flags >>= 1;
        if self.flags & 0x100 == 0 {
            let flag = *self.data.get(self.pos)?;
            self.pos += 1;
            self.flags = flag as u16 | 0xFF00;
        }

        let lo = *self.data.get(self.pos)?;
        if self.flags & 1 != 0 {
            self.pos += 1;
            return Some(Ok(Token::Literal(lo)));
        }

        let Some(&hi) = self.data.get(self.pos + 1) else {
            let offset = self.pos;
            self.pos = self.data.len();
            return Some(Err(DecodeError::Truncated { offset }));
        };
        self.pos += 2;
        Some(Ok(Token::from_pair(lo, hi)))
    }
}

/// Literal / match counts for a compressed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStats {
    pub literals: usize,
    pub matches: usize,
    pub expanded_len: usize,
}

/// Walk a stream and count its tokens.
pub fn stats(data: &[u8]) -> Result<TokenStats, DecodeError> {
    let mut st = TokenStats::default();
    for tok in TokenIter::new(data) {
        let tok = tok?;
        match tok {
            Token::Literal(_) => st.literals += 1,
            Token::Match { .. } => st.matches += 1,
        }
        st.expanded_len += tok.expanded_len();
    }
    Ok(st)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
