//! LZ4 streaming block compression.
//!
//! A [`StreamEncoder`] compresses a sequence of blocks where each block may
//! reference up to 64 KiB of the data compressed before it.  The resulting
//! blocks decode with a [`StreamDecoder`](super::decompress_api::StreamDecoder)
//! fed the same blocks in the same order (and primed with the same dictionary,
//! if one was loaded).
//!
//! The encoder keeps its own copy of the history, so callers may reuse or
//! drop their input buffers between calls.

use tracing::trace;

use super::compress::{clamp_acceleration, compress_generic, CompressError};
use super::match_finder::{HashTable, MatchFinder, SearchWindow};
use super::types::{TableType, LZ4_MAX_INPUT_SIZE};
use crate::config::{ACCELERATION_DEFAULT, LOG_TARGET, WINDOW_SIZE};

// Stream offsets are rebased before a block would carry them past this.
const RENORM_THRESHOLD: usize = 0x8000_0000;

/// Streaming compression context.
///
/// The hash table survives between blocks and holds stream offsets, so each
/// block costs time proportional to its own length however much history is
/// retained.
///
/// `Send` but intended for one producer: every mutating call takes
/// `&mut self`.
#[derive(Debug, Clone)]
pub struct StreamEncoder {
    /// The most recent (up to) [`WINDOW_SIZE`] bytes of uncompressed stream.
    history: Vec<u8>,
    table: HashTable,
    /// Stream offset of the byte following `history`.
    offset: usize,
    acceleration: i32,
}

impl StreamEncoder {
    /// A fresh encoder with the default acceleration.
    pub fn new() -> Self {
        Self::with_acceleration(ACCELERATION_DEFAULT)
    }

    /// A fresh encoder that uses `acceleration` for every block.
    pub fn with_acceleration(acceleration: i32) -> Self {
        Self {
            history: Vec::with_capacity(WINDOW_SIZE),
            table: HashTable::new(TableType::ByU32),
            offset: 0,
            acceleration,
        }
    }

    /// Replace the history with the last 64 KiB of `dict` and index it.
    ///
    /// Returns the number of dictionary bytes retained.
    pub fn load_dict(&mut self, dict: &[u8]) -> usize {
        self.reset();
        let keep = dict.len().min(WINDOW_SIZE);
        self.history.extend_from_slice(&dict[dict.len() - keep..]);
        self.offset = keep;
        MatchFinder::new(SearchWindow::with_dict(&self.history, &[]), &mut self.table)
            .load_dictionary();
        trace!(
            target: LOG_TARGET,
            dict_len = dict.len(),
            retained = keep,
            "stream encode: dictionary loaded"
        );
        keep
    }

    /// Compress `src` as the next block of the stream.
    ///
    /// Matches may reference the history; afterwards `src` becomes part of it.
    /// On error the history is unchanged, so the block may be retried with a
    /// larger `dst`.
    pub fn compress_continue(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, CompressError> {
        if src.len() > LZ4_MAX_INPUT_SIZE {
            return Err(CompressError::InputTooLarge);
        }
        self.renormalize(src.len());

        let base = self.offset - self.history.len();
        let window = SearchWindow::with_dict(&self.history, src);
        let mut finder = MatchFinder::with_base(window, &mut self.table, base);
        let n = compress_generic(&mut finder, dst, clamp_acceleration(self.acceleration))?;

        self.offset += src.len();
        self.remember(src);
        trace!(
            target: LOG_TARGET,
            input = src.len(),
            written = n,
            history = self.history.len(),
            "stream encode: block compressed"
        );
        Ok(n)
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.history.clear();
        self.table.clear();
        self.offset = 0;
    }

    /// Bytes of history the next block may reference.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Shift stream offsets down before the next `next_size` bytes would push
    /// them past [`RENORM_THRESHOLD`].  Entries older than the window are
    /// emptied.
    fn renormalize(&mut self, next_size: usize) {
        if self.offset + next_size <= RENORM_THRESHOLD {
            return;
        }
        let delta = self.offset.saturating_sub(WINDOW_SIZE);
        self.table.rebase(delta);
        self.offset -= delta;
        trace!(
            target: LOG_TARGET,
            delta,
            "stream encode: offsets rebased"
        );
    }

    fn remember(&mut self, src: &[u8]) {
        if src.len() >= WINDOW_SIZE {
            self.history.clear();
            self.history
                .extend_from_slice(&src[src.len() - WINDOW_SIZE..]);
            return;
        }
        let overflow = (self.history.len() + src.len()).saturating_sub(WINDOW_SIZE);
        self.history.drain(..overflow);
        self.history.extend_from_slice(src);
    }
}

impl Default for StreamEncoder {
    fn default() -> Self {
        Self::new()
    }
}
