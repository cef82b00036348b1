// LZSS encoder.
//
// Stream layout: groups of up to eight units, each group preceded by a flag
// byte (bit k set = unit k is a literal byte, clear = 2-byte match token).
//
//   token[0] = position & 0xFF
//   token[1] = ((position >> 4) & 0xF0) | (length - (THRESHOLD + 1))

use super::tree::{Match, MatchTree};
use super::{F, N, START, THRESHOLD};

/// Accumulates up to eight units and the flag byte that describes them.
struct CodeGroup {
    buf: [u8; 17],
    len: usize,
    mask: u16,
}

impl CodeGroup {
    fn new() -> Self {
        Self {
            buf: [0; 17],
            len: 1,
            mask: 1,
        }
    }

    fn literal(&mut self, byte: u8) {
        self.buf[0] |= self.mask as u8;
        self.buf[self.len] = byte;
        self.len += 1;
    }

    fn reference(&mut self, m: Match) {
        debug_assert!(m.position < N);
        debug_assert!((THRESHOLD + 1..=F).contains(&m.length));
        self.buf[self.len] = m.position as u8;
        self.buf[self.len + 1] =
            (((m.position >> 4) & 0xF0) | (m.length - (THRESHOLD + 1))) as u8;
        self.len += 2;
    }

    /// Advance to the next unit slot; returns true when the group is full.
    fn advance(&mut self) -> bool {
        self.mask <<= 1;
        self.mask == 0x100
    }

    fn flush_into(&mut self, out: &mut Vec<u8>) {
        if self.len > 1 {
            out.extend_from_slice(&self.buf[..self.len]);
        }
        self.buf[0] = 0;
        self.len = 1;
        self.mask = 1;
    }
}

/// Encoder state: ring buffer plus match trees.
///
/// Everything is reset by [`LzssEncoder::compress`], so one instance can be
/// reused across inputs without carrying state between them.
pub struct LzssEncoder {
    text: Vec<u8>,
    tree: MatchTree,
}

impl Default for LzssEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LzssEncoder {
    pub fn new() -> Self {
        Self {
            text: vec![0u8; N + F - 1],
            tree: MatchTree::new(),
        }
    }

    /// Compress `input` into a flag-grouped token stream.
    pub fn compress(&mut self, input: &[u8]) -> Vec<u8> {
        if input.is_empty() {
            return Vec::new();
        }

        self.text.fill(0);
        self.tree = MatchTree::new();

        let mut out = Vec::with_capacity(input.len() / 2 + 16);
        let mut group = CodeGroup::new();

        let mut s = 0usize;
        let mut r = START;

        // Prime the lookahead with the first F bytes.
        let mut len = input.len().min(F);
        self.text[r..r + len].copy_from_slice(&input[..len]);
        let mut ptr = len;

        // Seed the trees with the strings that run into the zeroed lead-in,
        // closest-to-start last, then the real first string.
        for i in 1..=F {
            self.tree.insert(&self.text, r - i);
        }
        let mut m = self.tree.insert(&self.text, r);

        while len > 0 {
            // Matches may be spuriously long near the end of input.
            if m.length > len {
                m.length = len;
            }

            if m.length <= THRESHOLD {
                m.length = 1;
                group.literal(self.text[r]);
            } else {
                group.reference(m);
            }

            if group.advance() {
                group.flush_into(&mut out);
            }

            let consumed = m.length;
            let mut i = 0;
            while i < consumed && ptr < input.len() {
                let c = input[ptr];
                ptr += 1;

                self.tree.delete(s);
                self.text[s] = c;
                // Mirror the head of the ring past N so comparisons never wrap.
                if s < F - 1 {
                    self.text[s + N] = c;
                }

                s = (s + 1) & (N - 1);
                r = (r + 1) & (N - 1);
                m = self.tree.insert(&self.text, r);
                i += 1;
            }

            // Input exhausted: keep sliding until the lookahead drains.
            while i < consumed {
                i += 1;
                self.tree.delete(s);
                s = (s + 1) & (N - 1);
                r = (r + 1) & (N - 1);
                len -= 1;
                if len != 0 {
                    m = self.tree.insert(&self.text, r);
                }
            }
        }

        group.flush_into(&mut out);
        log::trace!("lzss: {} -> {} bytes", input.len(), out.len());
        out
    }
}

/// Compress `input` with a fresh encoder.
pub fn compress(input: &[u8]) -> Vec<u8> {
    LzssEncoder::new().compress(input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
