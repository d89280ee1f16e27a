//! Fixed-capacity history window for streaming decompression.
//!
//! A ring buffer of [`WINDOW_SIZE`] bytes with a write cursor and a saturating
//! length.  The backing storage is allocated once, when the window is created,
//! and never resized: appending past capacity overwrites the oldest bytes.
//!
//! [`HistoryWindow::view`] exposes the retained bytes, oldest first, as a
//! [`DictView`] of at most two segments so the decoder can read across the
//! wrap point without the window being rotated.

use super::decompress_core::DictView;
use crate::config::WINDOW_SIZE;

/// The last (up to) [`WINDOW_SIZE`] bytes of a decoded stream.
pub struct HistoryWindow {
    buf: Box<[u8]>,
    /// Next write position in `buf`.
    cursor: usize,
    /// Number of valid bytes, saturating at `buf.len()`.
    len: usize,
}

impl HistoryWindow {
    /// An empty window with the default 64 KiB capacity.
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_SIZE)
    }

    /// An empty window retaining at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            cursor: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.len = 0;
    }

    /// Replace the history with the tail of `bytes`.
    pub fn reset_to(&mut self, bytes: &[u8]) {
        self.clear();
        self.append(bytes);
    }

    /// Append `bytes`, dropping the oldest history beyond capacity.
    pub fn append(&mut self, bytes: &[u8]) {
        let cap = self.buf.len();
        if cap == 0 || bytes.is_empty() {
            return;
        }
        if bytes.len() >= cap {
            self.buf.copy_from_slice(&bytes[bytes.len() - cap..]);
            self.cursor = 0;
            self.len = cap;
            return;
        }

        let first = (cap - self.cursor).min(bytes.len());
        self.buf[self.cursor..self.cursor + first].copy_from_slice(&bytes[..first]);
        let rest = bytes.len() - first;
        self.buf[..rest].copy_from_slice(&bytes[first..]);

        self.cursor = (self.cursor + bytes.len()) % cap;
        self.len = (self.len + bytes.len()).min(cap);
    }

    /// The retained bytes, oldest first.
    pub fn view(&self) -> DictView<'_> {
        if self.len < self.buf.len() {
            // Not yet wrapped: valid bytes end at the cursor.
            DictView::new(&self.buf[self.cursor - self.len..self.cursor])
        } else {
            DictView::split(&self.buf[self.cursor..], &self.buf[..self.cursor])
        }
    }

    /// Copy the retained bytes, oldest first, into a new `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        if self.len < self.buf.len() {
            out.extend_from_slice(&self.buf[self.cursor - self.len..self.cursor]);
        } else {
            out.extend_from_slice(&self.buf[self.cursor..]);
            out.extend_from_slice(&self.buf[..self.cursor]);
        }
        out
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new()
    }
}
