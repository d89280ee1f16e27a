//! E2E Test Suite 01: Block One-Shot API
//!
//! Validates the one-shot LZ4 block compression and decompression functions
//! through the crate-root re-exports:
//! - compress_default / compress_fast / compress_bound
//! - decompress_safe / decompress_safe_partial
//! - compress_block_to_vec / decompress_block_to_vec
//!
//! Every emitted block is also walked token by token to check the
//! end-of-block parsing restrictions (the last five bytes are literals).

extern crate lz4_block;

use lz4_block::{
    compress_block_to_vec, compress_bound, compress_default, compress_fast,
    decompress_block_to_vec, decompress_safe, decompress_safe_partial, LZ4_MAX_INPUT_SIZE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn roundtrip(original: &[u8]) -> Vec<u8> {
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let n = compress_default(original, &mut compressed).expect("compression should succeed");
    compressed.truncate(n);

    let mut restored = vec![0u8; original.len()];
    let m = decompress_safe(&compressed, &mut restored).expect("decompression should succeed");
    assert_eq!(m, original.len());
    assert_eq!(restored, original, "roundtrip mismatch");
    compressed
}

/// Length of the final literal run of a well-formed block.
fn trailing_literal_run(block: &[u8]) -> usize {
    let read_length = |ip: &mut usize| {
        let mut len = 0usize;
        loop {
            let b = block[*ip];
            *ip += 1;
            len += b as usize;
            if b != 255 {
                return len;
            }
        }
    };

    let mut ip = 0usize;
    loop {
        let token = block[ip];
        ip += 1;
        let mut lit = (token >> 4) as usize;
        if lit == 15 {
            lit += read_length(&mut ip);
        }
        ip += lit;
        if ip == block.len() {
            return lit;
        }
        ip += 2;
        if token & 0x0F == 0x0F {
            read_length(&mut ip);
        }
    }
}

fn xorshift(len: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    (0..len)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 7;
            s ^= s << 17;
            (s >> 56) as u8
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: roundtrips over the usual input shapes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_empty() {
    let compressed = roundtrip(b"");
    assert_eq!(compressed, [0x00]);
}

#[test]
fn test_roundtrip_all_zero() {
    let original = vec![0u8; 100_000];
    let compressed = roundtrip(&original);
    assert!(compressed.len() < 1_000, "{} bytes", compressed.len());
}

#[test]
fn test_roundtrip_repetitive_text() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(200);
    let compressed = roundtrip(&original);
    assert!(compressed.len() < original.len() / 10);
}

#[test]
fn test_roundtrip_random() {
    let original = xorshift(200_000, 0x9E37_79B9_7F4A_7C15);
    let compressed = roundtrip(&original);
    assert!(compressed.len() <= compress_bound(original.len()));
}

#[test]
fn test_roundtrip_mixed_regions() {
    let mut original = xorshift(30_000, 3);
    original.extend(std::iter::repeat(b'x').take(30_000));
    original.extend(xorshift(30_000, 4));
    let head = original[..20_000].to_vec();
    original.extend_from_slice(&head);
    roundtrip(&original);
}

#[test]
fn test_roundtrip_every_small_length() {
    let base = b"abcabcabcabd-abcabcabcabd-0123456789";
    for len in 0..base.len() {
        roundtrip(&base[..len]);
    }
}

#[test]
fn test_roundtrip_far_matches() {
    // Repeats at distances just below and above the 64 KiB offset limit.
    let chunk = xorshift(65_000, 17);
    let mut original = chunk.clone();
    original.extend_from_slice(&chunk);
    original.extend(xorshift(1_000, 18));
    original.extend_from_slice(&chunk[..5_000]);
    roundtrip(&original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: the 20 × 'a' scenario
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_twenty_a_scenario() {
    let original = [b'a'; 20];
    assert_eq!(compress_bound(20), 36);

    let compressed = roundtrip(&original);
    // Literal run of one 'a', offset-1 match, then the literal-only tail.
    assert_eq!(compressed[0] >> 4, 1);
    assert_eq!(compressed[1], b'a');
    assert_eq!(&compressed[2..4], &[0x01, 0x00]);
    assert_eq!(compressed[4], 0x50);
    assert_eq!(&compressed[5..], b"aaaaa");
    assert_eq!(trailing_literal_run(&compressed), 5);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: parsing restrictions hold on real output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_last_five_bytes_are_literals() {
    let inputs: Vec<Vec<u8>> = vec![
        vec![b'a'; 13],
        vec![b'a'; 1_000],
        b"hello hello hello hello hello".to_vec(),
        b"0123456789".repeat(500),
        xorshift(5_000, 99),
    ];
    for original in &inputs {
        let compressed = roundtrip(original);
        let tail = trailing_literal_run(&compressed);
        assert!(tail >= 5, "input of {} bytes ended with {tail} literals", original.len());
    }
}

#[test]
fn test_short_inputs_are_pure_literals() {
    for len in 0..13 {
        let original = vec![b'z'; len];
        let compressed = roundtrip(&original);
        assert_eq!(compressed.len(), len + 1);
        assert_eq!(trailing_literal_run(&compressed), len);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: compress_fast and acceleration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compress_fast_acceleration_trades_ratio() {
    let original = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit, ".repeat(100);
    let mut slow = vec![0u8; compress_bound(original.len())];
    let mut fast = vec![0u8; compress_bound(original.len())];
    let ns = compress_fast(&original, &mut slow, 1).unwrap();
    let nf = compress_fast(&original, &mut fast, 1_000).unwrap();
    assert!(ns <= nf, "acceleration 1: {ns}, acceleration 1000: {nf}");

    let mut restored = vec![0u8; original.len()];
    assert_eq!(decompress_safe(&fast[..nf], &mut restored), Ok(original.len()));
    assert_eq!(restored, original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: partial decompression
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_partial_decompression_prefixes() {
    let original = b"partial decode, partial decode, partial decode! ".repeat(40);
    let compressed = compress_block_to_vec(&original).unwrap();
    for target in (0..original.len()).step_by(97) {
        let mut dst = vec![0u8; original.len()];
        let n = decompress_safe_partial(&compressed, &mut dst, target).unwrap();
        assert_eq!(n, target);
        assert_eq!(&dst[..n], &original[..n]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: Vec helpers and constants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_vec_helpers_roundtrip() {
    let original = xorshift(10_000, 5);
    let compressed = compress_block_to_vec(&original).unwrap();
    assert_eq!(
        decompress_block_to_vec(&compressed, original.len()).unwrap(),
        original
    );
}

#[test]
fn test_constants() {
    assert_eq!(LZ4_MAX_INPUT_SIZE, 0x7E00_0000);
    assert_eq!(lz4_block::LZ4_DISTANCE_MAX, 65_535);
    assert_eq!(lz4_block::WINDOW_SIZE, 65_536);
    assert_eq!(lz4_block::LZ4_VERSION_STRING, "1.10.0");
}
