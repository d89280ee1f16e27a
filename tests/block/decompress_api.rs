// Unit tests for the public block decompression API
//
//   - decompress_safe / decompress_safe_partial / decompress_safe_using_dict
//   - decompress_block_to_vec exact-length contract
//   - StreamDecoder: fresh/primed state, history accounting, failure leaves
//     history untouched, dictionary priming, 64 KiB retention

use lz4_block::block::compress::{compress_bound, compress_default, compress_using_dict};
use lz4_block::block::decompress_api::{
    decompress_block_to_vec, decompress_safe, decompress_safe_partial, decompress_safe_using_dict,
    StreamDecoder,
};
use lz4_block::block::decompress_core::DecompressError;
use lz4_block::block::stream::StreamEncoder;
use lz4_block::config::WINDOW_SIZE;

fn compress_input(input: &[u8]) -> Vec<u8> {
    let mut compressed = vec![0u8; compress_bound(input.len())];
    let n = compress_default(input, &mut compressed).expect("compression failed");
    compressed.truncate(n);
    compressed
}

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| b"abcdefgh-0123"[i % 13] ^ (i / 97) as u8).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn safe_roundtrip() {
    let input = sample(5_000);
    let compressed = compress_input(&input);
    let mut out = vec![0u8; input.len()];
    assert_eq!(decompress_safe(&compressed, &mut out), Ok(input.len()));
    assert_eq!(out, input);
}

#[test]
fn safe_twenty_a() {
    let compressed = compress_input(&[b'a'; 20]);
    let mut out = [0u8; 20];
    assert_eq!(decompress_safe(&compressed, &mut out), Ok(20));
    assert_eq!(out, [b'a'; 20]);
}

#[test]
fn safe_empty_block() {
    let compressed = compress_input(b"");
    assert_eq!(compressed, [0x00]);
    assert_eq!(decompress_safe(&compressed, &mut []), Ok(0));
}

#[test]
fn safe_output_too_small_is_malformed() {
    let input = sample(1_000);
    let compressed = compress_input(&input);
    let mut out = vec![0u8; 100];
    assert_eq!(
        decompress_safe(&compressed, &mut out),
        Err(DecompressError::MalformedStream)
    );
}

#[test]
fn partial_returns_requested_prefix() {
    let input = sample(3_000);
    let compressed = compress_input(&input);
    for target in [0usize, 1, 17, 500, 2_999, 3_000] {
        let mut out = vec![0u8; input.len()];
        let n = decompress_safe_partial(&compressed, &mut out, target).unwrap();
        assert_eq!(n, target);
        assert_eq!(&out[..n], &input[..n], "target {target}");
    }
}

#[test]
fn partial_target_clamped_to_capacity() {
    let input = sample(3_000);
    let compressed = compress_input(&input);
    let mut out = vec![0u8; 40];
    let n = decompress_safe_partial(&compressed, &mut out, 10_000).unwrap();
    assert_eq!(n, 40);
    assert_eq!(&out[..], &input[..40]);
}

#[test]
fn partial_target_beyond_content() {
    let input = sample(300);
    let compressed = compress_input(&input);
    let mut out = vec![0u8; 1_000];
    let n = decompress_safe_partial(&compressed, &mut out, 1_000).unwrap();
    assert_eq!(n, 300);
    assert_eq!(&out[..n], &input[..]);
}

#[test]
fn using_dict_roundtrip() {
    let dict = sample(10_000);
    let input: Vec<u8> = dict[2_000..6_000].to_vec();
    let mut compressed = vec![0u8; compress_bound(input.len())];
    let n = compress_using_dict(&dict, &input, &mut compressed, 1).unwrap();
    let mut out = vec![0u8; input.len()];
    assert_eq!(
        decompress_safe_using_dict(&compressed[..n], &mut out, &dict),
        Ok(input.len())
    );
    assert_eq!(out, input);
}

#[test]
fn using_empty_dict_behaves_like_safe() {
    let input = sample(700);
    let compressed = compress_input(&input);
    let mut a = vec![0u8; input.len()];
    let mut b = vec![0u8; input.len()];
    assert_eq!(
        decompress_safe_using_dict(&compressed, &mut a, &[]),
        decompress_safe(&compressed, &mut b)
    );
    assert_eq!(a, b);
}

#[test]
fn using_dict_without_dict_fails() {
    let dict = sample(10_000);
    let input: Vec<u8> = dict[..4_000].to_vec();
    let mut compressed = vec![0u8; compress_bound(input.len())];
    let n = compress_using_dict(&dict, &input, &mut compressed, 1).unwrap();
    let mut out = vec![0u8; input.len()];
    assert_eq!(
        decompress_safe(&compressed[..n], &mut out),
        Err(DecompressError::MalformedStream)
    );
}

#[test]
fn to_vec_exact_length() {
    let input = sample(2_000);
    let compressed = compress_input(&input);
    assert_eq!(decompress_block_to_vec(&compressed, input.len()).unwrap(), input);
}

#[test]
fn to_vec_wrong_length_fails() {
    let input = sample(2_000);
    let compressed = compress_input(&input);
    assert_eq!(
        decompress_block_to_vec(&compressed, input.len() + 1),
        Err(DecompressError::MalformedStream)
    );
    assert_eq!(
        decompress_block_to_vec(&compressed, input.len() - 1),
        Err(DecompressError::MalformedStream)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// StreamDecoder
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decoder_starts_fresh() {
    let d = StreamDecoder::new();
    assert!(!d.is_primed());
    assert_eq!(d.history_len(), 0);
    let d = StreamDecoder::default();
    assert!(!d.is_primed());
}

#[test]
fn decoder_set_dictionary_primes() {
    let mut d = StreamDecoder::new();
    d.set_dictionary(b"some dictionary bytes");
    assert!(d.is_primed());
    assert_eq!(d.history_len(), 21);
    d.set_dictionary(&[]);
    assert!(!d.is_primed());
}

#[test]
fn decoder_set_dictionary_keeps_last_window() {
    let mut d = StreamDecoder::new();
    d.set_dictionary(&sample(100_000));
    assert_eq!(d.history_len(), WINDOW_SIZE);
}

#[test]
fn decoder_first_block_without_history() {
    let input = sample(1_234);
    let compressed = compress_input(&input);
    let mut d = StreamDecoder::new();
    let mut out = vec![0u8; input.len()];
    assert_eq!(d.decompress(&compressed, &mut out), Ok(input.len()));
    assert_eq!(out, input);
    assert_eq!(d.history_len(), input.len());
    assert!(d.is_primed());
}

#[test]
fn decoder_follows_encoder_across_blocks() {
    let mut e = StreamEncoder::new();
    let mut d = StreamDecoder::new();
    let data = sample(20_000);
    for chunk in data.chunks(3_000) {
        let mut compressed = vec![0u8; compress_bound(chunk.len())];
        let n = e.compress_continue(chunk, &mut compressed).unwrap();
        let mut out = vec![0u8; chunk.len()];
        assert_eq!(d.decompress(&compressed[..n], &mut out), Ok(chunk.len()));
        assert_eq!(out, chunk);
    }
    assert_eq!(d.history_len(), 20_000);
}

#[test]
fn decoder_with_dictionary() {
    let dict = sample(8_000);
    let input = dict[1_000..5_000].to_vec();
    let mut e = StreamEncoder::new();
    e.load_dict(&dict);
    let mut compressed = vec![0u8; compress_bound(input.len())];
    let n = e.compress_continue(&input, &mut compressed).unwrap();

    let mut d = StreamDecoder::new();
    d.set_dictionary(&dict);
    let mut out = vec![0u8; input.len()];
    assert_eq!(d.decompress(&compressed[..n], &mut out), Ok(input.len()));
    assert_eq!(out, input);
}

#[test]
fn decoder_failure_leaves_history_unchanged() {
    let first = sample(500);
    let mut d = StreamDecoder::new();
    let mut out = vec![0u8; first.len()];
    d.decompress(&compress_input(&first), &mut out).unwrap();
    assert_eq!(d.history_len(), 500);

    let mut junk_out = [0u8; 32];
    assert_eq!(
        d.decompress(&[0x16, b'a', 0x00, 0x00], &mut junk_out),
        Err(DecompressError::MalformedStream)
    );
    assert_eq!(d.history_len(), 500);

    let second = sample(800);
    let mut out = vec![0u8; second.len()];
    assert_eq!(d.decompress(&compress_input(&second), &mut out), Ok(800));
    assert_eq!(out, second);
    d.close();
}

#[test]
fn decoder_history_saturates_at_window() {
    let mut d = StreamDecoder::new();
    let block = sample(30_000);
    let compressed = compress_input(&block);
    for _ in 0..4 {
        let mut out = vec![0u8; block.len()];
        d.decompress(&compressed, &mut out).unwrap();
    }
    assert_eq!(d.history_len(), WINDOW_SIZE);
}
