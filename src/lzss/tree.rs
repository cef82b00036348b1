// Binary search trees for longest-match lookup.
//
// One tree per leading byte value. Nodes are ring-buffer positions, links are
// stored in three parallel index arrays:
//
//   left[0..=N]      left child  (index N = NIL scratch slot)
//   right[0..N+257]  right child; right[N+1+c] is the root of tree `c`
//   parent[0..=N]    parent link, NIL when the position is not in any tree
//
// The arrays are allocated once per encoder and never resized.

use super::{F, N, NIL};

/// Longest previously-seen string found while inserting a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Match {
    /// Ring-buffer position of the match.
    pub position: usize,
    /// Match length in bytes (0..=F).
    pub length: usize,
}

/// 256 intrusive BSTs over ring-buffer positions.
pub struct MatchTree {
    left: Vec<usize>,
    right: Vec<usize>,
    parent: Vec<usize>,
}

impl Default for MatchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchTree {
    /// Create an empty forest: every root and every parent link set to NIL.
    ///
    /// Child links of real nodes are written on insertion, so they start as
    /// NIL only for tidiness.
    pub fn new() -> Self {
        Self {
            left: vec![NIL; N + 1],
            right: vec![NIL; N + 257],
            parent: vec![NIL; N + 1],
        }
    }

    #[inline]
    fn root(byte: u8) -> usize {
        N + 1 + byte as usize
    }

    /// True if `pos` is currently linked into a tree.
    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.parent[pos] != NIL
    }

    /// Insert the `F`-byte string `buf[r..r + F]` into the tree of `buf[r]`.
    ///
    /// Returns the longest match met on the way down. If a full `F`-byte
    /// match is found, the old node is replaced by `r` (it would be evicted
    /// from the window before `r` anyway).
    ///
    /// `buf` must be at least `N + F - 1` bytes long.
    pub fn insert(&mut self, buf: &[u8], r: usize) -> Match {
        let mut cmp: i32 = 1;
        let mut p = Self::root(buf[r]);
        let mut best = Match::default();

        self.right[r] = NIL;
        self.left[r] = NIL;

        loop {
            if cmp >= 0 {
                if self.right[p] != NIL {
                    p = self.right[p];
                } else {
                    self.right[p] = r;
                    self.parent[r] = p;
                    return best;
                }
            } else if self.left[p] != NIL {
                p = self.left[p];
            } else {
                self.left[p] = r;
                self.parent[r] = p;
                return best;
            }

            let mut i = 1;
            while i < F {
                cmp = buf[r + i] as i32 - buf[p + i] as i32;
                if cmp != 0 {
                    break;
                }
                i += 1;
            }

            if i > best.length {
                best = Match {
                    position: p,
                    length: i,
                };
                if i >= F {
                    break;
                }
            }
        }

        // Full-length match: `r` takes over `p`'s place in the tree.
        self.parent[r] = self.parent[p];
        self.left[r] = self.left[p];
        self.right[r] = self.right[p];
        self.parent[self.left[p]] = r;
        self.parent[self.right[p]] = r;

        let up = self.parent[p];
        if self.right[up] == p {
            self.right[up] = r;
        } else {
            self.left[up] = r;
        }
        self.parent[p] = NIL;

        best
    }

    /// Remove position `p` from its tree. No-op if `p` is not linked.
    pub fn delete(&mut self, p: usize) {
        let up = self.parent[p];
        if up == NIL {
            return;
        }
        debug_assert!(
            self.right[up] == p || (up <= N && self.left[up] == p),
            "tree corrupted: node {p} not a child of its parent {up}"
        );

        let q = if self.right[p] == NIL {
            self.left[p]
        } else if self.left[p] == NIL {
            self.right[p]
        } else {
            // Both children present: promote the in-order predecessor.
            let mut q = self.left[p];
            if self.right[q] != NIL {
                while self.right[q] != NIL {
                    q = self.right[q];
                }
                let qp = self.parent[q];
                self.right[qp] = self.left[q];
                self.parent[self.left[q]] = qp;
                self.left[q] = self.left[p];
                self.parent[self.left[p]] = q;
            }
            self.right[q] = self.right[p];
            self.parent[self.right[p]] = q;
            q
        };

        self.parent[q] = up;
        if self.right[up] == p {
            self.right[up] = q;
        } else {
            self.left[up] = q;
        }
        self.parent[p] = NIL;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
