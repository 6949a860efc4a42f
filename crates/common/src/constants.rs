//! Shared constants used across bucketfs crates.

/// One kibibyte.
pub const KIB: usize = 1024;

/// One mebibyte.
pub const MIB: usize = 1024 * KIB;

/// Size of each memory-mapped chunk backing a block pool (128MB).
/// Every chunk is carved into fixed-size blocks of one tier.
pub const DEFAULT_CHUNK_SIZE: usize = 128 * MIB;

/// Block size of the large content tier (1MB).
pub const LARGE_BLOCK_SIZE: usize = MIB;

/// Block size of the small content tier (64KB).
pub const SMALL_BLOCK_SIZE: usize = 64 * KIB;

/// Number of block slots tracked by one bitmap word.
pub const BITMAP_WORD_BITS: usize = 64;

/// Upper bound on blocks pre-parked in the reuse channel when a chunk is added.
pub const CHUNK_PREFILL_MAX_BLOCKS: usize = 50;

/// Percentage of a new chunk's blocks pre-parked in the reuse channel.
pub const CHUNK_PREFILL_PERCENT: usize = 20;

/// Default capacity of a pool's reuse channel.
pub const DEFAULT_REUSE_CAPACITY: usize = 256;

/// Requests smaller than this many small-tier blocks are served from the
/// smallest tier only.
pub const SMALL_REQUEST_BLOCK_MULTIPLIER: usize = 4;
