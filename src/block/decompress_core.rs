//! LZ4 block decompression core engine.
//!
//!   - `read_variable_length`: bounded variable-length integer decoder
//!   - `decompress_generic`: the security-critical safe decompression loop
//!
//! # Security boundary
//!
//! This module is the **security-critical decompression path**.  Every read of
//! the compressed stream and every write into the output is preceded by an
//! explicit range check ("check then act").  Malformed or truncated input must
//! return `Err(DecompressError::MalformedStream)`; it must **never** panic,
//! read past `src`, or write past `dst`.
//!
//! The public error carries no detail.  The concrete cause is a
//! `MalformedReason`, logged through `tracing` at debug level together with
//! the input/output cursor positions.

use tracing::debug;

use super::types::{read_le16, LASTLITERALS, MFLIMIT, MINMATCH, ML_BITS, ML_MASK, RUN_MASK};
use crate::config::LOG_TARGET;

// ─────────────────────────────────────────────────────────────────────────────
// Error types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by LZ4 block decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecompressError {
    /// The compressed data is malformed, truncated, references bytes outside
    /// the available window, or does not fit the output buffer supplied by
    /// the caller.
    #[error("malformed compression stream")]
    MalformedStream,
}

/// Why a block was rejected.  Diagnostic only; never part of the public result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MalformedReason {
    /// Input ended in the middle of a token, length, literal run or offset.
    TruncatedInput,
    /// Match offset field was zero.
    ZeroOffset,
    /// Match offset reaches before the start of output plus dictionary.
    OffsetOutOfWindow,
    /// A literal run or match would write past the output buffer.
    OutputOverrun,
    /// A match ends inside the region reserved for trailing literals.
    LastLiteralsViolation,
    /// A variable-length field does not fit in `usize`.
    LengthOverflow,
    /// Empty output requested for a block that is not the empty block.
    NonEmptyBlock,
}

#[derive(Debug, Clone, Copy)]
struct Failure {
    reason: MalformedReason,
    input_pos: usize,
    output_pos: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dictionary view
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes that logically precede the output buffer, as up to two segments.
///
/// `older ++ newer` is the dictionary; the last byte of `newer` sits directly
/// before `dst[0]`.  Two segments let a ring buffer be used without first
/// making it contiguous.  `DictView::default()` is the empty dictionary.
#[derive(Clone, Copy, Debug, Default)]
pub struct DictView<'a> {
    older: &'a [u8],
    newer: &'a [u8],
}

impl<'a> DictView<'a> {
    /// A contiguous dictionary.
    pub fn new(dict: &'a [u8]) -> Self {
        Self {
            older: &[],
            newer: dict,
        }
    }

    /// A dictionary split in two: `older` followed by `newer`.
    pub fn split(older: &'a [u8], newer: &'a [u8]) -> Self {
        Self { older, newer }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.older.len() + self.newer.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `out.len()` dictionary bytes starting at dictionary index `start`.
    ///
    /// Caller guarantees `start + out.len() <= self.len()`.
    #[inline]
    fn copy_out(&self, start: usize, out: &mut [u8]) {
        let n = out.len();
        if start >= self.older.len() {
            let s = start - self.older.len();
            out.copy_from_slice(&self.newer[s..s + n]);
            return;
        }
        let from_older = (self.older.len() - start).min(n);
        out[..from_older].copy_from_slice(&self.older[start..start + from_older]);
        let rest = n - from_older;
        out[from_older..].copy_from_slice(&self.newer[..rest]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// read_variable_length
// ─────────────────────────────────────────────────────────────────────────────

/// Read the extension bytes of a literal or match length.
///
/// Each `255` byte adds 255 and continues; the first byte below 255 adds its
/// value and ends the field.  Returns the accumulated extension.
#[inline(always)]
fn read_variable_length(src: &[u8], ip: &mut usize) -> Result<usize, MalformedReason> {
    let mut length: usize = 0;
    loop {
        let s = *src.get(*ip).ok_or(MalformedReason::TruncatedInput)?;
        *ip += 1;
        length = length
            .checked_add(s as usize)
            .ok_or(MalformedReason::LengthOverflow)?;
        if s != 255 {
            return Ok(length);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match copy
// ─────────────────────────────────────────────────────────────────────────────

/// Copy `len` bytes from `dst[from..]` to `dst[to..]` where `from < to`.
///
/// When the ranges overlap (`to - from < len`) the result is the repeating
/// pattern `dst[from..to]`, as an LZ77 back-reference requires.  The source
/// span doubles on every pass, so this costs O(log(len / distance)) memmoves.
#[inline]
fn copy_overlapping(dst: &mut [u8], from: usize, to: usize, len: usize) {
    debug_assert!(from < to && to + len <= dst.len());
    let mut done = 0usize;
    while done < len {
        // `done` is always a multiple of the distance, so copying from the
        // start of the pattern keeps it in phase.
        let n = (to + done - from).min(len - done);
        dst.copy_within(from..from + n, to + done);
        done += n;
    }
}

/// Replay a validated match of `len` bytes at `op`, `offset` bytes back.
///
/// Caller has checked `offset <= op + dict.len()` and `op + len <= dst.len()`.
#[inline]
fn copy_match(dst: &mut [u8], mut op: usize, offset: usize, mut len: usize, dict: &DictView<'_>) {
    let from = if offset > op {
        // Starts in the dictionary, `back` bytes before dst[0].
        let back = offset - op;
        let n = back.min(len);
        dict.copy_out(dict.len() - back, &mut dst[op..op + n]);
        op += n;
        len -= n;
        if len == 0 {
            return;
        }
        // Continues from the start of the output.
        0
    } else {
        op - offset
    };
    copy_overlapping(dst, from, op, len);
}

// ─────────────────────────────────────────────────────────────────────────────
// decompress_generic
// ─────────────────────────────────────────────────────────────────────────────

/// Core LZ4 block decompression loop.
///
/// | Parameter  | Meaning                                                      |
/// |------------|--------------------------------------------------------------|
/// | `src`      | Compressed block                                             |
/// | `dst`      | Output buffer; its length is the output capacity            |
/// | `dict`     | Bytes preceding `dst[0]` that matches may reference          |
/// | `partial`  | `false` = decode the full block; `true` = stop once `dst` is full |
///
/// Returns the number of bytes written to `dst` on success, or
/// `Err(DecompressError::MalformedStream)` for any invalid input.  On error
/// the contents of `dst` are unspecified (but nothing outside it was touched).
pub fn decompress_generic(
    src: &[u8],
    dst: &mut [u8],
    dict: DictView<'_>,
    partial: bool,
) -> Result<usize, DecompressError> {
    decode(src, dst, &dict, partial).map_err(|failure| {
        debug!(
            target: LOG_TARGET,
            reason = ?failure.reason,
            input_pos = failure.input_pos,
            output_pos = failure.output_pos,
            input_len = src.len(),
            output_len = dst.len(),
            dict_len = dict.len(),
            "decompress: malformed block"
        );
        DecompressError::MalformedStream
    })
}

fn decode(src: &[u8], dst: &mut [u8], dict: &DictView<'_>, partial: bool) -> Result<usize, Failure> {
    let mut ip: usize = 0;
    let mut op: usize = 0;
    let oend = dst.len();

    macro_rules! fail {
        ($reason:expr) => {
            return Err(Failure {
                reason: $reason,
                input_pos: ip,
                output_pos: op,
            })
        };
    }
    macro_rules! tri {
        ($e:expr) => {
            match $e {
                Ok(v) => v,
                Err(reason) => fail!(reason),
            }
        };
    }

    // ── Degenerate buffers ───────────────────────────────────────────────────
    if oend == 0 {
        if partial {
            return Ok(0);
        }
        // The empty block is the single token 0x00.
        if src.len() == 1 && src[0] == 0 {
            return Ok(0);
        }
        fail!(MalformedReason::NonEmptyBlock);
    }
    if src.is_empty() {
        fail!(MalformedReason::TruncatedInput);
    }

    // Literal runs ending past this point must be the last sequence.
    let literal_limit = oend.saturating_sub(MFLIMIT);
    // Matches may not run into the trailing-literal region.
    let match_limit = oend.saturating_sub(LASTLITERALS);

    loop {
        // ── Token ────────────────────────────────────────────────────────────
        let Some(&token) = src.get(ip) else {
            fail!(MalformedReason::TruncatedInput);
        };
        ip += 1;

        // ── Literal run ──────────────────────────────────────────────────────
        let mut lit_len = (token >> ML_BITS) as usize;
        if lit_len == RUN_MASK as usize {
            let ext = tri!(read_variable_length(src, &mut ip));
            lit_len = tri!(lit_len
                .checked_add(ext)
                .ok_or(MalformedReason::LengthOverflow));
        }

        if partial {
            // Copy what fits; a short input or a full output ends the block.
            let n = lit_len.min(src.len() - ip).min(oend - op);
            dst[op..op + n].copy_from_slice(&src[ip..ip + n]);
            ip += n;
            op += n;
            if n < lit_len || ip == src.len() || op == oend {
                break;
            }
        } else {
            let lit_end = tri!(ip.checked_add(lit_len).ok_or(MalformedReason::LengthOverflow));
            let out_end = tri!(op.checked_add(lit_len).ok_or(MalformedReason::LengthOverflow));
            if lit_end > src.len() {
                fail!(MalformedReason::TruncatedInput);
            }
            if out_end > oend {
                fail!(MalformedReason::OutputOverrun);
            }
            dst[op..out_end].copy_from_slice(&src[ip..lit_end]);
            ip = lit_end;
            op = out_end;

            // The literal-only sequence consumes the rest of the block.
            if ip == src.len() {
                break;
            }
            if op > literal_limit {
                fail!(MalformedReason::LastLiteralsViolation);
            }
        }

        // ── Offset ───────────────────────────────────────────────────────────
        let Some(offset) = read_le16(src, ip) else {
            fail!(MalformedReason::TruncatedInput);
        };
        let offset = offset as usize;
        ip += 2;
        if offset == 0 {
            fail!(MalformedReason::ZeroOffset);
        }
        if offset > op + dict.len() {
            fail!(MalformedReason::OffsetOutOfWindow);
        }

        // ── Match length ─────────────────────────────────────────────────────
        let mut match_len = (token & ML_MASK as u8) as usize;
        if match_len == ML_MASK as usize {
            let ext = tri!(read_variable_length(src, &mut ip));
            match_len = tri!(match_len
                .checked_add(ext)
                .ok_or(MalformedReason::LengthOverflow));
        }
        match_len += MINMATCH;

        let mut match_end = tri!(op.checked_add(match_len).ok_or(MalformedReason::LengthOverflow));
        if partial {
            if match_end > oend {
                match_end = oend;
                match_len = oend - op;
            }
        } else {
            if match_end > oend {
                fail!(MalformedReason::OutputOverrun);
            }
            if match_end > match_limit {
                fail!(MalformedReason::LastLiteralsViolation);
            }
        }

        // ── Match copy ───────────────────────────────────────────────────────
        copy_match(dst, op, offset, match_len, dict);
        op = match_end;

        if partial && op == oend {
            break;
        }
    }

    Ok(op)
}
