//! LZ4 block compression and decompression.
//!
//! The block format is a bare sequence of (literals, match) pairs with no
//! header, checksum or length; callers carry the decompressed size out of band.

pub mod compress;
pub mod decompress_api;
pub mod decompress_core;
pub mod match_finder;
pub mod stream;
pub mod types;
pub mod window;

pub use compress::{
    compress_block_to_vec, compress_bound, compress_default, compress_fast, compress_using_dict,
    CompressError,
};
pub use decompress_api::{
    decompress_block_to_vec, decompress_safe, decompress_safe_partial, decompress_safe_using_dict,
    StreamDecoder,
};
pub use decompress_core::{DecompressError, DictView};
pub use stream::StreamEncoder;
pub use types::{LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE};
pub use window::HistoryWindow;
