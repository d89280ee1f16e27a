//! Hash-table match finder for the LZ4 fast encoder.
//!
//! The finder keeps one position per hash bucket (the most recent position
//! whose 4-byte prefix hashed there).  A lookup overwrites the bucket with the
//! current position and then verifies the candidate by comparing bytes, so
//! hash collisions cost a comparison but never produce a wrong match.
//!
//! Positions live in a single coordinate space spanning an optional dictionary
//! followed by the input (see [`SearchWindow`]); a match may start in the
//! dictionary and run on into the input, exactly as the decoder will replay
//! it.
//!
//! The [`HashTable`] is separate from the finder so a streaming encoder can
//! keep it between blocks.  Entries then hold stream offsets, and the finder
//! translates them through a `base` (the stream offset of window position 0);
//! anything below `base` has left the window and is ignored.

use super::types::{
    count, hash4, read_le32, TableType, LASTLITERALS, LZ4_DISTANCE_MAX, MINMATCH,
};
use crate::config::WINDOW_SIZE;

// ─────────────────────────────────────────────────────────────────────────────
// Search window
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only view of the bytes a match may reference: `dict ++ input`.
///
/// Position `p < dict_len()` addresses `dict[p]`; larger positions address
/// `input[p - dict_len()]`.  The dictionary is trimmed to its last
/// [`WINDOW_SIZE`] bytes since nothing older is reachable by a 16-bit offset.
#[derive(Clone, Copy, Debug)]
pub struct SearchWindow<'a> {
    dict: &'a [u8],
    input: &'a [u8],
}

impl<'a> SearchWindow<'a> {
    /// Window over `input` alone.
    pub fn new(input: &'a [u8]) -> Self {
        Self { dict: &[], input }
    }

    /// Window over the tail of `dict` followed by `input`.
    pub fn with_dict(dict: &'a [u8], input: &'a [u8]) -> Self {
        let keep = dict.len().min(WINDOW_SIZE);
        Self {
            dict: &dict[dict.len() - keep..],
            input,
        }
    }

    #[inline(always)]
    pub fn dict(&self) -> &'a [u8] {
        self.dict
    }

    #[inline(always)]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Position of `input[0]`.
    #[inline(always)]
    pub fn input_start(&self) -> usize {
        self.dict.len()
    }

    /// One past the last addressable position.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.dict.len() + self.input.len()
    }

    #[inline(always)]
    pub fn byte_at(&self, pos: usize) -> u8 {
        if pos < self.dict.len() {
            self.dict[pos]
        } else {
            self.input[pos - self.dict.len()]
        }
    }

    /// The four bytes starting at `pos`, little-endian, possibly straddling
    /// the dictionary/input seam.  `None` when fewer than four bytes remain.
    #[inline(always)]
    pub fn prefix_at(&self, pos: usize) -> Option<u32> {
        let start = self.input_start();
        if pos >= start {
            return read_le32(self.input, pos - start);
        }
        if pos + MINMATCH <= start {
            return read_le32(self.dict, pos);
        }
        if pos + MINMATCH > self.end() {
            return None;
        }
        let bytes = [
            self.byte_at(pos),
            self.byte_at(pos + 1),
            self.byte_at(pos + 2),
            self.byte_at(pos + 3),
        ];
        Some(u32::from_le_bytes(bytes))
    }

    /// Number of bytes shared by the sequences at `candidate` and `pos`,
    /// counting only bytes of `pos` below `limit`.
    ///
    /// `pos` must lie in the input.  A candidate in the dictionary is compared
    /// up to the dictionary end and then continues against the start of the
    /// input, because that is what follows it in the window.
    pub fn common_length(&self, candidate: usize, pos: usize, limit: usize) -> usize {
        let start = self.input_start();
        debug_assert!(pos >= start && candidate < pos && pos <= limit);
        let current = &self.input[pos - start..limit - start];

        if candidate >= start {
            return count(&self.input[candidate - start..], current);
        }

        let dict_tail = &self.dict[candidate..];
        let n = count(dict_tail, current);
        if n < dict_tail.len() || n == current.len() {
            return n;
        }
        n + count(self.input, &current[n..])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match
// ─────────────────────────────────────────────────────────────────────────────

/// A verified back-reference: `length` bytes at `position` equal the bytes at
/// the queried position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Window position of the earlier occurrence.
    pub position: usize,
    /// Match length, always `>= MINMATCH`.
    pub length: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Hash table
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum Slots {
    U16(Box<[u16]>),
    U32(Box<[u32]>),
}

/// Single-entry-per-bucket position table.
///
/// A zeroed table is valid: every empty bucket names position 0, which the
/// finder verifies like any other candidate.
#[derive(Clone)]
pub struct HashTable {
    slots: Slots,
}

impl HashTable {
    pub fn new(table_type: TableType) -> Self {
        let slots = match table_type {
            TableType::ByU16 => Slots::U16(vec![0u16; table_type.size()].into_boxed_slice()),
            TableType::ByU32 => Slots::U32(vec![0u32; table_type.size()].into_boxed_slice()),
        };
        Self { slots }
    }

    #[inline(always)]
    pub fn table_type(&self) -> TableType {
        match self.slots {
            Slots::U16(_) => TableType::ByU16,
            Slots::U32(_) => TableType::ByU32,
        }
    }

    #[inline(always)]
    fn get(&self, h: usize) -> usize {
        match &self.slots {
            Slots::U16(t) => t[h] as usize,
            Slots::U32(t) => t[h] as usize,
        }
    }

    #[inline(always)]
    fn put(&mut self, h: usize, value: usize) {
        match &mut self.slots {
            Slots::U16(t) => {
                debug_assert!(value <= u16::MAX as usize);
                t[h] = value as u16;
            }
            Slots::U32(t) => {
                debug_assert!(value <= u32::MAX as usize);
                t[h] = value as u32;
            }
        }
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        match &mut self.slots {
            Slots::U16(t) => t.fill(0),
            Slots::U32(t) => t.fill(0),
        }
    }

    /// Shift every entry down by `delta`; entries below `delta` are emptied.
    pub fn rebase(&mut self, delta: usize) {
        match &mut self.slots {
            Slots::U16(t) => {
                for e in t.iter_mut() {
                    *e = (*e as usize).saturating_sub(delta) as u16;
                }
            }
            Slots::U32(t) => {
                for e in t.iter_mut() {
                    *e = (*e as usize).saturating_sub(delta) as u32;
                }
            }
        }
    }
}

impl std::fmt::Debug for HashTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashTable")
            .field("table_type", &self.table_type())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match finder
// ─────────────────────────────────────────────────────────────────────────────

/// Greedy match finder over a [`SearchWindow`], backed by a borrowed
/// [`HashTable`].
pub struct MatchFinder<'a, 't> {
    window: SearchWindow<'a>,
    table: &'t mut HashTable,
    base: usize,
}

impl<'a, 't> MatchFinder<'a, 't> {
    /// Finder whose table entries are window positions.
    pub fn new(window: SearchWindow<'a>, table: &'t mut HashTable) -> Self {
        Self::with_base(window, table, 0)
    }

    /// Finder whose table entries are `window position + base`.
    pub fn with_base(window: SearchWindow<'a>, table: &'t mut HashTable, base: usize) -> Self {
        Self {
            window,
            table,
            base,
        }
    }

    #[inline(always)]
    pub fn window(&self) -> &SearchWindow<'a> {
        &self.window
    }

    /// Index every dictionary position whose 4-byte prefix lies entirely in
    /// the dictionary.
    pub fn load_dictionary(&mut self) {
        let dict_len = self.window.dict().len();
        if dict_len < MINMATCH {
            return;
        }
        for pos in 0..=dict_len - MINMATCH {
            self.insert(pos);
        }
    }

    #[inline(always)]
    fn bucket(&self, seq: u32) -> usize {
        hash4(seq, self.table.table_type()) as usize
    }

    /// Record `pos` as the most recent occurrence of its prefix.
    #[inline(always)]
    pub fn insert(&mut self, pos: usize) {
        if let Some(seq) = self.window.prefix_at(pos) {
            let h = self.bucket(seq);
            self.table.put(h, pos + self.base);
        }
    }

    /// Look for an earlier occurrence of the bytes at `pos`, then record `pos`.
    ///
    /// The match is extended forward while bytes agree and the current side
    /// stays below `match_limit` (callers pass `end - LASTLITERALS`).
    /// Returns `None` when the bucket holds nothing inside the window, the
    /// candidate is out of reach of a 16-bit offset, or its bytes differ
    /// (hash collision).
    #[inline]
    pub fn find(&mut self, pos: usize, match_limit: usize) -> Option<Match> {
        let seq = self.window.prefix_at(pos)?;
        let h = self.bucket(seq);
        let stored = self.table.get(h);
        self.table.put(h, pos + self.base);

        let candidate = stored.checked_sub(self.base)?;
        if candidate >= pos || pos - candidate > LZ4_DISTANCE_MAX {
            return None;
        }
        if self.window.prefix_at(candidate)? != seq {
            return None;
        }
        debug_assert!(match_limit + LASTLITERALS <= self.window.end());
        if pos + MINMATCH > match_limit {
            return None;
        }

        let extra = self
            .window
            .common_length(candidate + MINMATCH, pos + MINMATCH, match_limit);
        Some(Match {
            position: candidate,
            length: MINMATCH + extra,
        })
    }
}
