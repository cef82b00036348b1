// Ring-buffer LZSS codec used for AKB pixel payloads.
//
// Okumura-style LZSS: 4 KiB sliding window, 18-byte lookahead, matches
// found through 256 binary search trees keyed by leading byte.
//
// - `tree`: MatchTree: intrusive index-array BSTs over ring positions
// - `encoder`: compress(): greedy match selection + 8-unit flag groups
// - `token`: Token iterator over a compressed stream
// - `decoder`: tree-free stream replay

pub mod decoder;
pub mod encoder;
pub mod token;
pub mod tree;

pub use decoder::{DecodeError, decompress, decompress_exact};
pub use encoder::{LzssEncoder, compress};
pub use token::{Token, TokenIter};

/// Size of the ring buffer (sliding window).
pub const N: usize = 4096;

/// Upper limit for a match length (lookahead size).
pub const F: usize = 18;

/// Matches this long or shorter are sent as literals.
pub const THRESHOLD: usize = 2;

/// Sentinel tree index meaning "no node".
pub const NIL: usize = N;

/// Ring position where both encoder and decoder start writing.
pub const START: usize = N - F;
