// lz4-block: LZ4 block-format compressor and safe decompressor

//! Compress and decompress raw LZ4 blocks.
//!
//! ```
//! use lz4_block::{compress_bound, compress_default, decompress_safe};
//!
//! let input = b"an lz4 block, an lz4 block, an lz4 block";
//! let mut compressed = vec![0u8; compress_bound(input.len())];
//! let n = compress_default(input, &mut compressed).unwrap();
//!
//! let mut restored = vec![0u8; input.len()];
//! let m = decompress_safe(&compressed[..n], &mut restored).unwrap();
//! assert_eq!(&restored[..m], input);
//! ```

pub mod block;
pub mod config;

// ── Version constants ─────────────────────────────────────────────────────────
pub const LZ4_VERSION_MAJOR: u32 = 1;
pub const LZ4_VERSION_MINOR: u32 = 10;
pub const LZ4_VERSION_RELEASE: u32 = 0;
pub const LZ4_VERSION_NUMBER: u32 =
    LZ4_VERSION_MAJOR * 100 * 100 + LZ4_VERSION_MINOR * 100 + LZ4_VERSION_RELEASE;
pub const LZ4_VERSION_STRING: &str = "1.10.0";

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::{
    compress_block_to_vec, compress_bound, compress_default, compress_fast, compress_using_dict,
    decompress_block_to_vec, decompress_safe, decompress_safe_partial, decompress_safe_using_dict,
    CompressError, DecompressError, StreamDecoder, StreamEncoder, LZ4_DISTANCE_MAX,
    LZ4_MAX_INPUT_SIZE,
};
pub use config::WINDOW_SIZE;
