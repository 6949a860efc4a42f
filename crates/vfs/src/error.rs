//! Error types for the VFS crate.

use thiserror::Error;

/// Errors that can occur during memory pool operations.
#[derive(Debug, Error)]
pub enum MemoryPoolError {
    /// Block size is zero.
    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),

    /// Block size does not fit in a single chunk.
    #[error("Block size {block_size} exceeds chunk size {chunk_size}")]
    BlockLargerThanChunk {
        /// Requested block size in bytes.
        block_size: usize,
        /// Size of each memory-mapped chunk in bytes.
        chunk_size: usize,
    },

    /// Requested allocation size is not positive.
    #[error("Invalid allocation size: {0}")]
    InvalidSize(usize),

    /// Mapping a new chunk failed.
    #[error("Failed to map {chunk_size} byte chunk: {source}")]
    ChunkAllocation {
        /// Size of the chunk that could not be mapped.
        chunk_size: usize,
        /// Underlying mmap error.
        #[source]
        source: std::io::Error,
    },

    /// Pool has been closed.
    #[error("Pool is closed")]
    PoolClosed,

    /// A freshly grown chunk was drained by concurrent callers before a block could be taken.
    #[error("Pool exhausted: {block_size} byte blocks unavailable after growth")]
    Exhausted {
        /// Block size of the exhausted pool.
        block_size: usize,
    },

    /// Growing would map more than the configured maximum.
    #[error("Pool capacity limit reached: {max_capacity} bytes")]
    CapacityExceeded {
        /// Configured maximum mapped bytes.
        max_capacity: u64,
    },

    /// Smart pool was configured without any tiers.
    #[error("Smart pool requires at least one block size tier")]
    NoTiers,
}

/// Errors that can occur during content cache operations.
#[derive(Debug, Error)]
pub enum VfsError {
    /// No file cached at the path.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File metadata is cached but its content has been released.
    #[error("Content evicted: {0}")]
    Evicted(String),

    /// Backing memory could not be allocated.
    #[error("Memory pool error: {0}")]
    Pool(#[from] MemoryPoolError),
}
