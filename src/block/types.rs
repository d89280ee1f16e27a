//! LZ4 block constants, byte-reading helpers, match-length counting and hashing.
//!
//!   - Format constants (MINMATCH, LASTLITERALS, MFLIMIT, token nibble masks)
//!   - Little-endian readers over slices (bounds-checked, never panicking on
//!     the hot paths because callers prove the range first)
//!   - `count`: how many bytes two positions have in common
//!   - `TableType` and `hash4`: the hash-table layout and the 4-byte
//!     Knuth-multiplicative prefix hash used by the match finder
//!
//! See the [LZ4 block format specification] for the meaning of each limit.
//!
//! [LZ4 block format specification]: https://github.com/lz4/lz4/blob/dev/doc/lz4_Block_format.md

use crate::config::MEMORY_USAGE;

// ─────────────────────────────────────────────────────────────────────────────
// Format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded in an LZ4 block.
pub const MINMATCH: usize = 4;

/// Last N bytes of the input are always emitted as literals.
/// See doc/lz4_Block_format.md#parsing-restrictions.
pub const LASTLITERALS: usize = 5;

/// A match may not start within this many bytes of the end of the input.
/// See doc/lz4_Block_format.md#parsing-restrictions.
pub const MFLIMIT: usize = 12;

/// Minimum input length that may produce any match at all.
pub const LZ4_MIN_LENGTH: usize = MFLIMIT + 1;

/// Maximum back-reference distance representable by the 16-bit offset field.
pub const LZ4_DISTANCE_MAX: usize = 65_535;

/// Largest input a single block may describe (2 113 929 216 bytes).
pub const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

pub const ML_BITS: u32 = 4;
pub const ML_MASK: u32 = (1u32 << ML_BITS) - 1;
pub const RUN_BITS: u32 = 8 - ML_BITS;
pub const RUN_MASK: u32 = (1u32 << RUN_BITS) - 1;

// ─────────────────────────────────────────────────────────────────────────────
// Hash-table sizing
// ─────────────────────────────────────────────────────────────────────────────

/// Hash log: number of bits kept from each hash value.
pub const LZ4_HASHLOG: u32 = MEMORY_USAGE - 2; // = 12
/// Number of `u32` entries in the encoder hash table.
pub const LZ4_HASH_SIZE_U32: usize = 1 << LZ4_HASHLOG;
/// Number of `u16` entries in the small-input table (same memory, twice the
/// buckets).
pub const LZ4_HASH_SIZE_U16: usize = 1 << (LZ4_HASHLOG + 1);

/// Windows shorter than this address every insertable position in 16 bits.
pub const LZ4_64KLIMIT: usize = 64 * 1024 + (MFLIMIT - 1);

/// Width of the positions stored in the encoder hash table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableType {
    /// 16-bit positions; only for windows shorter than [`LZ4_64KLIMIT`].
    ByU16,
    /// 32-bit positions.
    ByU32,
}

impl TableType {
    /// The table a one-shot encode over a window of `window_len` bytes uses.
    #[inline]
    pub fn for_window(window_len: usize) -> Self {
        if window_len < LZ4_64KLIMIT {
            TableType::ByU16
        } else {
            TableType::ByU32
        }
    }

    #[inline(always)]
    pub fn hash_log(self) -> u32 {
        match self {
            TableType::ByU16 => LZ4_HASHLOG + 1,
            TableType::ByU32 => LZ4_HASHLOG,
        }
    }

    /// Number of buckets in a table of this type.
    #[inline(always)]
    pub fn size(self) -> usize {
        match self {
            TableType::ByU16 => LZ4_HASH_SIZE_U16,
            TableType::ByU32 => LZ4_HASH_SIZE_U32,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Byte readers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u16` at `pos`.
///
/// Returns `None` if fewer than two bytes remain.
#[inline(always)]
pub fn read_le16(buf: &[u8], pos: usize) -> Option<u16> {
    let bytes = buf.get(pos..pos.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a little-endian `u32` at `pos`.
///
/// Returns `None` if fewer than four bytes remain.
#[inline(always)]
pub fn read_le32(buf: &[u8], pos: usize) -> Option<u32> {
    let bytes = buf.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

// ─────────────────────────────────────────────────────────────────────────────
// Common-byte counting
// ─────────────────────────────────────────────────────────────────────────────

/// Count how many leading bytes `a` and `b` have in common.
///
/// Compares eight bytes at a time, then finishes byte by byte.  The result is
/// at most `min(a.len(), b.len())`.
#[inline]
pub fn count(a: &[u8], b: &[u8]) -> usize {
    let limit = a.len().min(b.len());
    let mut n = 0usize;

    while n + 8 <= limit {
        let x = u64::from_le_bytes(word(&a[n..n + 8]));
        let y = u64::from_le_bytes(word(&b[n..n + 8]));
        let diff = x ^ y;
        if diff != 0 {
            return n + (diff.trailing_zeros() >> 3) as usize;
        }
        n += 8;
    }

    while n < limit && a[n] == b[n] {
        n += 1;
    }
    n
}

#[inline(always)]
fn word(chunk: &[u8]) -> [u8; 8] {
    let mut w = [0u8; 8];
    w.copy_from_slice(chunk);
    w
}

// ─────────────────────────────────────────────────────────────────────────────
// Hashing
// ─────────────────────────────────────────────────────────────────────────────

/// 4-byte Knuth-multiplicative hash of a match-candidate prefix.
///
/// Keeps the top `table_type.hash_log()` bits, so the result always indexes a
/// table of `table_type.size()` slots.
#[inline(always)]
pub fn hash4(sequence: u32, table_type: TableType) -> u32 {
    // MINMATCH * 8 == 32; shift removes the low (32 - hash_log) bits.
    sequence.wrapping_mul(2_654_435_761u32) >> (32 - table_type.hash_log())
}
