#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let compressed = lz4_block::compress_block_to_vec(data).expect("bound-sized output must fit");
    assert!(compressed.len() <= lz4_block::compress_bound(data.len()));

    let recovered = lz4_block::decompress_block_to_vec(&compressed, data.len())
        .expect("valid block failed to decode");
    assert_eq!(recovered, data, "block round-trip mismatch");

    // Dictionary path: split the input and compress the tail against the head.
    let (dict, tail) = data.split_at(data.len() / 2);
    let mut dst = vec![0u8; lz4_block::compress_bound(tail.len())];
    let n = lz4_block::compress_using_dict(dict, tail, &mut dst, 1).unwrap();
    let mut out = vec![0u8; tail.len()];
    assert_eq!(
        lz4_block::decompress_safe_using_dict(&dst[..n], &mut out, dict),
        Ok(tail.len())
    );
    assert_eq!(out, tail);
});
