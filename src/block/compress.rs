//! LZ4 block compression: one-shot and dictionary APIs.
//!
//! | Rust function                  | Purpose                                          |
//! |--------------------------------|--------------------------------------------------|
//! | [`compress_bound`]             | worst-case output size for an input length       |
//! | [`compress_default`]           | one-shot compression, acceleration 1             |
//! | [`compress_fast`]              | one-shot compression, caller-chosen acceleration |
//! | [`compress_using_dict`]        | compression that may reference a dictionary      |
//! | [`compress_block_to_vec`]      | allocate, compress, truncate                     |
//!
//! The encoder drives a [`MatchFinder`] greedily across the input.  Each
//! compressed sequence is a literal run followed by a match (offset + length);
//! the last [`LASTLITERALS`] bytes are always emitted as a final literal run.
//!
//! Capacity-exceeded conditions are signalled as
//! [`Err(CompressError::InsufficientOutputSpace)`](CompressError::InsufficientOutputSpace).
//! Space for each sequence is checked before any of
//! it is written, so an undersized `dst` is never overrun.
//!
//! See the [LZ4 block format specification] for the authoritative description
//! of the on-disk layout.
//!
//! [LZ4 block format specification]: https://github.com/lz4/lz4/blob/dev/doc/lz4_Block_format.md

use tracing::debug;

use super::match_finder::{HashTable, Match, MatchFinder, SearchWindow};
use super::types::{
    TableType, LASTLITERALS, LZ4_MAX_INPUT_SIZE, LZ4_MIN_LENGTH, MFLIMIT, MINMATCH, ML_BITS,
    ML_MASK, RUN_MASK,
};
use crate::config::{ACCELERATION_DEFAULT, ACCELERATION_MAX, LOG_TARGET, SKIP_TRIGGER};

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by LZ4 block compression functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CompressError {
    /// The output buffer is too small to hold the compressed data.
    /// Size it with [`compress_bound`] and retry.
    #[error("insufficient space for compression")]
    InsufficientOutputSpace,
    /// The input exceeds [`LZ4_MAX_INPUT_SIZE`].
    #[error("input larger than the maximum LZ4 block input size")]
    InputTooLarge,
}

// ─────────────────────────────────────────────────────────────────────────────
// Utility
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for a given input size: `n + n/255 + 16`.
///
/// Total and monotone; saturates at `usize::MAX` instead of wrapping.
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    input_size
        .saturating_add(input_size / 255)
        .saturating_add(16)
}

/// Number of extension bytes needed to encode `len` once the 4-bit field
/// holds its maximum.
#[inline(always)]
fn extension_len(len: usize, mask: u32) -> usize {
    let mask = mask as usize;
    if len >= mask {
        (len - mask) / 255 + 1
    } else {
        0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequence writer
// ─────────────────────────────────────────────────────────────────────────────

/// Cursor over the caller's output buffer.
///
/// Every `write_*` method computes the exact size of what it is about to emit
/// and fails before touching `dst` when it does not fit.
struct SequenceWriter<'d> {
    dst: &'d mut [u8],
    op: usize,
}

impl<'d> SequenceWriter<'d> {
    fn new(dst: &'d mut [u8]) -> Self {
        Self { dst, op: 0 }
    }

    #[inline(always)]
    fn reserve(&self, needed: usize) -> Result<(), CompressError> {
        if needed > self.dst.len() - self.op {
            return Err(CompressError::InsufficientOutputSpace);
        }
        Ok(())
    }

    #[inline(always)]
    fn push(&mut self, byte: u8) {
        self.dst[self.op] = byte;
        self.op += 1;
    }

    /// Emit the 255-run extension of `len` (already known to be `>= mask`).
    #[inline(always)]
    fn push_extension(&mut self, len: usize, mask: u32) {
        let mut rest = len - mask as usize;
        while rest >= 255 {
            self.push(255);
            rest -= 255;
        }
        self.push(rest as u8);
    }

    #[inline(always)]
    fn push_literals(&mut self, literals: &[u8]) {
        self.dst[self.op..self.op + literals.len()].copy_from_slice(literals);
        self.op += literals.len();
    }

    /// Emit one full sequence: token, literal run, offset, match length.
    fn write_sequence(
        &mut self,
        literals: &[u8],
        offset: u16,
        match_length: usize,
    ) -> Result<(), CompressError> {
        debug_assert!(match_length >= MINMATCH && offset != 0);
        let lit_len = literals.len();
        let ml_code = match_length - MINMATCH;

        let needed = 1
            + extension_len(lit_len, RUN_MASK)
            + lit_len
            + 2
            + extension_len(ml_code, ML_MASK);
        self.reserve(needed)?;

        let lit_nibble = lit_len.min(RUN_MASK as usize) as u8;
        let ml_nibble = ml_code.min(ML_MASK as usize) as u8;
        self.push((lit_nibble << ML_BITS) | ml_nibble);
        if lit_len >= RUN_MASK as usize {
            self.push_extension(lit_len, RUN_MASK);
        }
        self.push_literals(literals);

        let [lo, hi] = offset.to_le_bytes();
        self.push(lo);
        self.push(hi);

        if ml_code >= ML_MASK as usize {
            self.push_extension(ml_code, ML_MASK);
        }
        Ok(())
    }

    /// Emit the closing literal-only sequence.
    fn write_last_literals(&mut self, literals: &[u8]) -> Result<(), CompressError> {
        let lit_len = literals.len();
        self.reserve(1 + extension_len(lit_len, RUN_MASK) + lit_len)?;

        let lit_nibble = lit_len.min(RUN_MASK as usize) as u8;
        self.push(lit_nibble << ML_BITS);
        if lit_len >= RUN_MASK as usize {
            self.push_extension(lit_len, RUN_MASK);
        }
        self.push_literals(literals);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Core compression loop
// ─────────────────────────────────────────────────────────────────────────────

/// Inner core of LZ4 block compression.
///
/// Compresses `finder.window().input()` into `dst`.  Matches may reference
/// any earlier window position, including dictionary bytes, as long as the
/// distance fits in 16 bits.  Dictionary positions are only found if the
/// caller indexed them (or left them in a table kept from earlier blocks).
///
/// `acceleration` must already be clamped to `[1, ACCELERATION_MAX]`.
///
/// Returns the number of bytes written to `dst`.
pub(crate) fn compress_generic(
    finder: &mut MatchFinder<'_, '_>,
    dst: &mut [u8],
    acceleration: i32,
) -> Result<usize, CompressError> {
    let window = *finder.window();
    let capacity = dst.len();
    let mut out = SequenceWriter::new(dst);
    match encode_sequences(finder, &mut out, acceleration) {
        Ok(()) => Ok(out.op),
        Err(e) => {
            debug!(
                target: LOG_TARGET,
                input_len = window.input().len(),
                dict_len = window.input_start(),
                capacity,
                written = out.op,
                "compress: output buffer too small"
            );
            Err(e)
        }
    }
}

/// Greedy parse of `window.input()`, writing every sequence into `out`.
fn encode_sequences(
    finder: &mut MatchFinder<'_, '_>,
    out: &mut SequenceWriter<'_>,
    acceleration: i32,
) -> Result<(), CompressError> {
    let window = *finder.window();
    let input = window.input();
    let start = window.input_start();
    let end = window.end();
    // Window position of the first byte not yet emitted.
    let mut anchor = start;

    // Breaking out of 'compress at any point skips to the trailing-literals
    // epilogue, which encodes any remaining unmatched bytes.
    'compress: {
        // Input too small to compress: emit everything as literals.
        if input.len() < LZ4_MIN_LENGTH {
            break 'compress;
        }

        // A match may not start past this position...
        let last_match_start = end - MFLIMIT;
        // ...and may not cover the final LASTLITERALS bytes.
        let match_limit = end - LASTLITERALS;

        finder.insert(start);
        let mut ip = start + 1;

        loop {
            // ── Find a match ─────────────────────────────────────────────────
            // After 2^SKIP_TRIGGER consecutive misses the step grows, so
            // incompressible regions are crossed quickly.
            let mut step = 1usize;
            let mut search_match_nb = (acceleration as usize) << SKIP_TRIGGER;
            let found: Match = loop {
                if ip > last_match_start {
                    break 'compress;
                }
                if let Some(m) = finder.find(ip, match_limit) {
                    break m;
                }
                ip += step;
                step = search_match_nb >> SKIP_TRIGGER;
                search_match_nb += 1;
            };

            // ── Catch up: extend the match backwards over pending literals ───
            let mut match_pos = found.position;
            let mut match_length = found.length;
            while ip > anchor
                && match_pos > 0
                && window.byte_at(ip - 1) == window.byte_at(match_pos - 1)
            {
                ip -= 1;
                match_pos -= 1;
                match_length += 1;
            }

            // ── Encode the sequence ──────────────────────────────────────────
            let offset = (ip - match_pos) as u16;
            out.write_sequence(&input[anchor - start..ip - start], offset, match_length)?;

            ip += match_length;
            anchor = ip;

            if ip > last_match_start {
                break 'compress;
            }

            // Fill the table with a position inside the match just emitted.
            finder.insert(ip - 2);
        }
    }

    // ── Last literals ────────────────────────────────────────────────────────
    out.write_last_literals(&input[anchor - start..])
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot public API
// ─────────────────────────────────────────────────────────────────────────────

#[inline(always)]
pub(crate) fn clamp_acceleration(acceleration: i32) -> i32 {
    acceleration.clamp(ACCELERATION_DEFAULT, ACCELERATION_MAX)
}

/// Compress `src` into `dst` with a user-supplied `acceleration` factor.
///
/// Larger accelerations trade ratio for speed; values are clamped to
/// `[1, ACCELERATION_MAX]`.
///
/// Returns the number of bytes written to `dst`.
///
/// # Errors
///
/// - [`CompressError::InputTooLarge`] if `src` exceeds [`LZ4_MAX_INPUT_SIZE`].
/// - [`CompressError::InsufficientOutputSpace`] if `dst` cannot hold the
///   block; size it with [`compress_bound`] to rule this out.
pub fn compress_fast(src: &[u8], dst: &mut [u8], acceleration: i32) -> Result<usize, CompressError> {
    compress_using_dict(&[], src, dst, acceleration)
}

/// Compress `src` into `dst` with the default acceleration factor (1).
///
/// This is the recommended entry point for one-shot LZ4 block compression.
/// Size `dst` with [`compress_bound`] to guarantee success.
pub fn compress_default(src: &[u8], dst: &mut [u8]) -> Result<usize, CompressError> {
    compress_fast(src, dst, ACCELERATION_DEFAULT)
}

/// Compress `src` so that matches may reference the last 64 KiB of `dict`.
///
/// The result must be decoded with the same dictionary, either through
/// [`decompress_safe_using_dict`](super::decompress_api::decompress_safe_using_dict)
/// or a [`StreamDecoder`](super::decompress_api::StreamDecoder) primed with it.
/// An empty `dict` behaves exactly like [`compress_fast`].
///
/// Windows (dictionary plus input) shorter than
/// [`LZ4_64KLIMIT`](super::types::LZ4_64KLIMIT) use the 16-bit table, which
/// has twice the buckets for the same memory.
pub fn compress_using_dict(
    dict: &[u8],
    src: &[u8],
    dst: &mut [u8],
    acceleration: i32,
) -> Result<usize, CompressError> {
    if src.len() > LZ4_MAX_INPUT_SIZE {
        return Err(CompressError::InputTooLarge);
    }
    let window = SearchWindow::with_dict(dict, src);
    let mut table = HashTable::new(TableType::for_window(window.end()));
    let mut finder = MatchFinder::new(window, &mut table);
    if src.len() >= LZ4_MIN_LENGTH {
        finder.load_dictionary();
    }
    compress_generic(&mut finder, dst, clamp_acceleration(acceleration))
}

/// Compress `src` into a freshly allocated, exactly-sized `Vec`.
pub fn compress_block_to_vec(src: &[u8]) -> Result<Vec<u8>, CompressError> {
    let mut dst = vec![0u8; compress_bound(src.len())];
    let n = compress_default(src, &mut dst)?;
    dst.truncate(n);
    Ok(dst)
}
