// config.rs: compile-time configuration constants.
//
// The block codec has no runtime configuration: no environment variables,
// no config files.  Everything a caller can tune is either a function argument
// (the acceleration factor) or one of the constants below.

// Log2 of the encoder hash-table memory, in bytes.
// 14 → 16 KiB → 4096 `u32` slots, or 8192 `u16` slots for small windows.
// Raising it improves ratio on large inputs at the cost of a bigger per-call
// allocation.
pub const MEMORY_USAGE: u32 = 14;

// Default acceleration factor: probe every position.
pub const ACCELERATION_DEFAULT: i32 = 1;

// Largest acceleration factor accepted; larger requests are clamped.
pub const ACCELERATION_MAX: i32 = 65_537;

// Number of consecutive failed probes (as a power of two) before the encoder
// starts skipping ahead.  Higher → better ratio on incompressible data, slower.
pub const SKIP_TRIGGER: u32 = 6;

// Size of the history window retained by the streaming encoder and decoder.
pub const WINDOW_SIZE: usize = 64 * 1024;

// `tracing` target used for every event emitted by the codec.
pub const LOG_TARGET: &str = "lz4_block";
