//! Public LZ4 block decompression API.
//!
//!   - One-shot decompression: [`decompress_safe`], [`decompress_safe_partial`]
//!   - Dictionary decompression: [`decompress_safe_using_dict`]
//!   - Streaming decode context: [`StreamDecoder`]
//!   - Allocation helper: [`decompress_block_to_vec`]
//!
//! # Safety model
//!
//! Every function here is safe.  All of them funnel into
//! [`decompress_generic`], which validates each token against the input,
//! output and dictionary bounds before copying anything.
//!
//! # Streaming
//!
//! A [`StreamDecoder`] owns a 64 KiB [`HistoryWindow`].  Each successful
//! [`StreamDecoder::decompress`] appends its output to the window so the next
//! block may reference it; [`StreamDecoder::set_dictionary`] replaces the
//! window wholesale.  The context is `Send` but not meant to be shared: all
//! mutating calls take `&mut self`, so concurrent use needs an external lock.

use tracing::trace;

use super::decompress_core::{decompress_generic, DecompressError, DictView};
use super::window::HistoryWindow;
use crate::config::LOG_TARGET;

// ─────────────────────────────────────────────────────────────────────────────
// One-shot safe API
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress a full LZ4 block with no dictionary.
///
/// `dst.len()` must be the expected decompressed size (or larger: the block
/// format carries no length, so the caller supplies it out of band).
///
/// Returns the number of bytes written into `dst`, or
/// `Err(DecompressError::MalformedStream)` for invalid input.
pub fn decompress_safe(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    decompress_generic(src, dst, DictView::default(), false)
}

/// Decompress up to `target_output_size` bytes from an LZ4 block.
///
/// `dst.len()` is the available capacity; at most
/// `min(target_output_size, dst.len())` bytes are written.  Decoding stops as
/// soon as that many bytes exist, so the rest of the block is never inspected.
///
/// Returns the number of bytes written, or
/// `Err(DecompressError::MalformedStream)` on error.
pub fn decompress_safe_partial(
    src: &[u8],
    dst: &mut [u8],
    target_output_size: usize,
) -> Result<usize, DecompressError> {
    let output_size = target_output_size.min(dst.len());
    decompress_generic(src, &mut dst[..output_size], DictView::default(), true)
}

/// Decompress an LZ4 block whose matches may reference `dict`.
///
/// `dict` holds the bytes that preceded this block when it was compressed
/// (only its last 64 KiB are reachable).  An empty `dict` is equivalent to
/// [`decompress_safe`].
pub fn decompress_safe_using_dict(
    src: &[u8],
    dst: &mut [u8],
    dict: &[u8],
) -> Result<usize, DecompressError> {
    decompress_generic(src, dst, DictView::new(dict), false)
}

/// Decompress `src` into a new `Vec` of exactly `decompressed_len` bytes.
///
/// Fails if the block is malformed or decodes to fewer bytes than requested.
pub fn decompress_block_to_vec(
    src: &[u8],
    decompressed_len: usize,
) -> Result<Vec<u8>, DecompressError> {
    let mut dst = vec![0u8; decompressed_len];
    let n = decompress_safe(src, &mut dst)?;
    if n != decompressed_len {
        return Err(DecompressError::MalformedStream);
    }
    Ok(dst)
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming decode context
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming decompression context.
///
/// Lifecycle:
///
/// ```text
/// Fresh ──set_dictionary / decompress──▶ Primed ──decompress*──▶ Primed ──close──▶ Closed
/// ```
///
/// [`close`](StreamDecoder::close) consumes the context, so a closed decoder
/// cannot be used again.  Dropping it releases the window as well.
///
/// # Example
///
/// ```
/// use lz4_block::block::{compress_bound, StreamDecoder, StreamEncoder};
///
/// let blocks: [&[u8]; 2] = [b"hello hello hello hello", b"hello hello world, hello!"];
/// let mut encoder = StreamEncoder::new();
/// let mut decoder = StreamDecoder::new();
///
/// for block in blocks {
///     let mut compressed = vec![0u8; compress_bound(block.len())];
///     let n = encoder.compress_continue(block, &mut compressed).unwrap();
///
///     let mut out = vec![0u8; block.len()];
///     decoder.decompress(&compressed[..n], &mut out).unwrap();
///     assert_eq!(out, block);
/// }
/// decoder.close();
/// ```
pub struct StreamDecoder {
    history: HistoryWindow,
}

impl StreamDecoder {
    /// Create a fresh context with no history.
    pub fn new() -> Self {
        Self {
            history: HistoryWindow::new(),
        }
    }

    /// Replace the remembered history with `dictionary`.
    ///
    /// Only the last 64 KiB are retained.  Passing an empty slice returns the
    /// context to the fresh state.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) {
        self.history.reset_to(dictionary);
        trace!(
            target: LOG_TARGET,
            dict_len = dictionary.len(),
            retained = self.history.len(),
            "stream decode: dictionary set"
        );
    }

    /// Decompress the next block of the stream into `dst`.
    ///
    /// Matches may reference the current history.  On success the produced
    /// bytes (`dst[..n]`) are appended to the history and `n` is returned.  On
    /// failure the history is left exactly as it was.
    pub fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
        let n = decompress_generic(src, dst, self.history.view(), false)?;
        self.history.append(&dst[..n]);
        trace!(
            target: LOG_TARGET,
            produced = n,
            history = self.history.len(),
            "stream decode: block decoded"
        );
        Ok(n)
    }

    /// `true` once a dictionary has been set or a non-empty block decoded.
    pub fn is_primed(&self) -> bool {
        !self.history.is_empty()
    }

    /// Number of history bytes the next block may reference.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Release the context.  It cannot be used afterwards.
    pub fn close(self) {
        trace!(
            target: LOG_TARGET,
            history = self.history.len(),
            "stream decode: closed"
        );
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}
