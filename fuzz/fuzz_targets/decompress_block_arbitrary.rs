#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Err results are expected; what we verify is no panics and no writes past
    // the requested length.

    // Zero-length output buffer.
    let _ = lz4_block::decompress_safe(data, &mut []);

    // Fixed sizes plus one proportional to the input, capped at 1 MiB.
    let proportional = data.len().saturating_mul(255).min(1 << 20);
    for len in [16usize, 4_096, data.len(), proportional] {
        let mut dst = vec![0u8; len];
        if let Ok(n) = lz4_block::decompress_safe(data, &mut dst) {
            assert!(n <= len);
        }
        if let Ok(n) = lz4_block::decompress_safe_partial(data, &mut dst, len / 2) {
            assert!(n <= len / 2);
        }
    }

    // Dictionary-relative offsets.
    let mut dst = vec![0u8; 4_096];
    let _ = lz4_block::decompress_safe_using_dict(data, &mut dst, &[0x5A; 300]);
});
