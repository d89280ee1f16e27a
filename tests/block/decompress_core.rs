// Unit tests for the block decompression core
//
//   - decompress_generic: literal-only blocks, the empty block, degenerate buffers
//   - Overlapping match copies (offset 1, offset 2) replay the pattern
//   - Dictionary views: contiguous, split, and matches spanning the seam
//   - Malformed input: zero offset, out-of-window offset, truncation,
//     end-of-block parsing restrictions
//   - Partial mode stops once the output is full

use lz4_block::block::decompress_core::{decompress_generic, DecompressError, DictView};

fn full(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    decompress_generic(src, dst, DictView::default(), false)
}

// token 0x10 (ll=1, no match), literal 'A'
const BLOCK_A: &[u8] = &[0x10, b'A'];

// token 0x50 (ll=5, no match), literals "Hello"
const BLOCK_HELLO: &[u8] = &[0x50, b'H', b'e', b'l', b'l', b'o'];

// 'a', then offset 1 / length 100 (nibble 15 + extension 81), then "bbbbb"
const BLOCK_RUN_100: &[u8] = &[
    0x1F, b'a', 0x01, 0x00, 81, 0x50, b'b', b'b', b'b', b'b', b'b',
];

// ─────────────────────────────────────────────────────────────────────────────
// DecompressError
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn error_display() {
    assert_eq!(
        DecompressError::MalformedStream.to_string(),
        "malformed compression stream"
    );
}

#[test]
fn error_is_copy_and_eq() {
    let e = DecompressError::MalformedStream;
    let f = e;
    assert_eq!(e, f);
}

// ─────────────────────────────────────────────────────────────────────────────
// Literal-only blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn single_literal() {
    let mut dst = [0u8; 1];
    assert_eq!(full(BLOCK_A, &mut dst), Ok(1));
    assert_eq!(dst, *b"A");
}

#[test]
fn five_literals() {
    let mut dst = [0u8; 5];
    assert_eq!(full(BLOCK_HELLO, &mut dst), Ok(5));
    assert_eq!(&dst, b"Hello");
}

#[test]
fn larger_output_reports_bytes_written() {
    let mut dst = [0u8; 64];
    assert_eq!(full(BLOCK_HELLO, &mut dst), Ok(5));
}

#[test]
fn literal_run_longer_than_output_is_rejected() {
    let mut dst = [0u8; 4];
    assert_eq!(
        full(BLOCK_HELLO, &mut dst),
        Err(DecompressError::MalformedStream)
    );
}

#[test]
fn extended_literal_length() {
    // 15 + 255 + 255 + 0 = 525 literals.
    let mut src = vec![0xF0, 255, 255, 0];
    src.extend((0..525u32).map(|i| i as u8));
    let mut dst = vec![0u8; 525];
    assert_eq!(full(&src, &mut dst), Ok(525));
    assert_eq!(&dst[..], &src[4..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Degenerate buffers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_block_into_empty_output() {
    assert_eq!(full(&[0x00], &mut []), Ok(0));
}

#[test]
fn other_block_into_empty_output_is_rejected() {
    assert_eq!(full(BLOCK_A, &mut []), Err(DecompressError::MalformedStream));
    assert_eq!(full(&[], &mut []), Err(DecompressError::MalformedStream));
    assert_eq!(
        full(&[0x00, 0x00], &mut []),
        Err(DecompressError::MalformedStream)
    );
}

#[test]
fn empty_input_is_rejected() {
    let mut dst = [0u8; 8];
    assert_eq!(full(&[], &mut dst), Err(DecompressError::MalformedStream));
}

// ─────────────────────────────────────────────────────────────────────────────
// Match copies
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn offset_one_repeats_single_byte() {
    let mut dst = vec![0u8; 106];
    assert_eq!(full(BLOCK_RUN_100, &mut dst), Ok(106));
    assert!(dst[..101].iter().all(|&b| b == b'a'));
    assert_eq!(&dst[101..], b"bbbbb");
}

#[test]
fn offset_two_repeats_pair() {
    // "ab", offset 2 / length 20 (nibble 15 + extension 1), "xxxxx"
    let src = [0x2F, b'a', b'b', 0x02, 0x00, 0x01, 0x50, b'x', b'x', b'x', b'x', b'x'];
    let mut dst = [0u8; 27];
    assert_eq!(full(&src, &mut dst), Ok(27));
    assert_eq!(&dst[..22], "ab".repeat(11).as_bytes());
    assert_eq!(&dst[22..], b"xxxxx");
}

// ─────────────────────────────────────────────────────────────────────────────
// Malformed blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_offset_is_rejected() {
    let src = [0x16, b'a', 0x00, 0x00, 0x50, b'b', b'b', b'b', b'b', b'b'];
    let mut dst = [0u8; 16];
    assert_eq!(full(&src, &mut dst), Err(DecompressError::MalformedStream));
}

#[test]
fn offset_before_output_start_is_rejected() {
    let src = [0x16, b'a', 0x02, 0x00, 0x50, b'b', b'b', b'b', b'b', b'b'];
    let mut dst = [0u8; 16];
    assert_eq!(full(&src, &mut dst), Err(DecompressError::MalformedStream));
}

#[test]
fn match_past_output_end_is_rejected() {
    let mut dst = vec![0u8; 50];
    assert_eq!(
        full(BLOCK_RUN_100, &mut dst),
        Err(DecompressError::MalformedStream)
    );
}

#[test]
fn match_into_last_literals_is_rejected() {
    // 'a' + 10 × 'a' via offset 1, then a single trailing literal.
    let src = [0x16, b'a', 0x01, 0x00, 0x10, b'b'];
    let mut dst = [0u8; 12];
    assert_eq!(full(&src, &mut dst), Err(DecompressError::MalformedStream));
}

#[test]
fn truncated_block_never_reports_full_output() {
    for cut in 0..BLOCK_RUN_100.len() {
        let mut dst = vec![0u8; 106];
        let r = full(&BLOCK_RUN_100[..cut], &mut dst);
        assert_ne!(r, Ok(106), "cut at {cut}");
    }
}

#[test]
fn truncated_offset_is_rejected() {
    let src = [0x16, b'a', 0x01];
    let mut dst = [0u8; 16];
    assert_eq!(full(&src, &mut dst), Err(DecompressError::MalformedStream));
}

#[test]
fn unterminated_length_extension_is_rejected() {
    let mut dst = [0u8; 1_000];
    assert_eq!(
        full(&[0xF0, 255, 255], &mut dst),
        Err(DecompressError::MalformedStream)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Dictionary views
// ─────────────────────────────────────────────────────────────────────────────

// 'a', then offset 2 / length 10, then "bbbbb"
const BLOCK_DICT_PAIR: &[u8] = &[0x16, b'a', 0x02, 0x00, 0x50, b'b', b'b', b'b', b'b', b'b'];

#[test]
fn match_starting_in_dictionary() {
    let mut dst = [0u8; 16];
    let r = decompress_generic(BLOCK_DICT_PAIR, &mut dst, DictView::new(b"z"), false);
    assert_eq!(r, Ok(16));
    assert_eq!(&dst, b"azazazazazabbbbb");
}

#[test]
fn split_dictionary_reads_newest_segment_last() {
    let mut dst = [0u8; 16];
    let r = decompress_generic(
        BLOCK_DICT_PAIR,
        &mut dst,
        DictView::split(b"xy", b"z"),
        false,
    );
    assert_eq!(r, Ok(16));
    assert_eq!(&dst, b"azazazazazabbbbb");
}

#[test]
fn match_spanning_both_segments_and_output() {
    // No literals, offset 3 / length 10, then "bbbbb"
    let src = [0x06, 0x03, 0x00, 0x50, b'b', b'b', b'b', b'b', b'b'];
    let mut dst = [0u8; 15];
    let r = decompress_generic(&src, &mut dst, DictView::split(b"xy", b"z"), false);
    assert_eq!(r, Ok(15));
    assert_eq!(&dst, b"xyzxyzxyzxbbbbb");
}

#[test]
fn offset_beyond_dictionary_is_rejected() {
    let src = [0x06, 0x04, 0x00, 0x50, b'b', b'b', b'b', b'b', b'b'];
    let mut dst = [0u8; 15];
    let r = decompress_generic(&src, &mut dst, DictView::split(b"xy", b"z"), false);
    assert_eq!(r, Err(DecompressError::MalformedStream));
}

#[test]
fn dict_view_len() {
    assert!(DictView::default().is_empty());
    assert_eq!(DictView::new(b"abc").len(), 3);
    assert_eq!(DictView::split(b"ab", b"cde").len(), 5);
}

// ─────────────────────────────────────────────────────────────────────────────
// Partial mode
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn partial_stops_inside_match() {
    let mut dst = [0u8; 7];
    let r = decompress_generic(BLOCK_RUN_100, &mut dst, DictView::default(), true);
    assert_eq!(r, Ok(7));
    assert_eq!(&dst, b"aaaaaaa");
}

#[test]
fn partial_stops_inside_trailing_literals() {
    let mut dst = [0u8; 103];
    let r = decompress_generic(BLOCK_RUN_100, &mut dst, DictView::default(), true);
    assert_eq!(r, Ok(103));
    assert_eq!(&dst[101..], b"bb");
}

#[test]
fn partial_with_room_decodes_everything() {
    let mut dst = [0u8; 200];
    let r = decompress_generic(BLOCK_RUN_100, &mut dst, DictView::default(), true);
    assert_eq!(r, Ok(106));
}

#[test]
fn partial_into_empty_output() {
    let r = decompress_generic(BLOCK_RUN_100, &mut [], DictView::default(), true);
    assert_eq!(r, Ok(0));
}

#[test]
fn partial_still_rejects_bad_offset() {
    let src = [0x16, b'a', 0x00, 0x00, 0x50, b'b', b'b', b'b', b'b', b'b'];
    let mut dst = [0u8; 16];
    let r = decompress_generic(&src, &mut dst, DictView::default(), true);
    assert_eq!(r, Err(DecompressError::MalformedStream));
}
