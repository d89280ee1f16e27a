#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the block size; the rest is split into blocks and fed
    // through one decoder so history from earlier blocks is exercised.
    let Some((&size, rest)) = data.split_first() else {
        return;
    };
    let block_len = (size as usize % 64) + 1;
    let mut decoder = lz4_block::StreamDecoder::new();
    decoder.set_dictionary(b"fuzzing dictionary fuzzing dictionary");
    let mut out = vec![0u8; 2_048];
    for block in rest.chunks(block_len) {
        let before = decoder.history_len();
        match decoder.decompress(block, &mut out) {
            Ok(n) => assert!(n <= out.len()),
            Err(_) => assert_eq!(decoder.history_len(), before),
        }
    }
    decoder.close();
});
