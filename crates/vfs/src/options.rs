//! Configuration options for the block pools.
//!
//! Block sizes and reservations are passed in explicitly by the mounting
//! front-end; nothing here reads the environment or a config file. The
//! structs derive serde so a front-end can embed them in its own config.
//!
//! # Example
//!
//! ```ignore
//! let options = SmartPoolOptions::default()
//!     .with_tier(PoolOptions::new(256 * KIB).with_reserved_bytes(16 * MIB));
//!
//! let pool = SmartPool::with_options(options)?;
//! ```

use serde::{Deserialize, Serialize};

use bucketfs_common::{DEFAULT_CHUNK_SIZE, DEFAULT_REUSE_CAPACITY, LARGE_BLOCK_SIZE, SMALL_BLOCK_SIZE};

// ============================================================================
// Pool Options
// ============================================================================

/// Configuration for a single fixed-block-size pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolOptions {
    /// Size of each block in bytes.
    pub block_size: usize,
    /// Size of each memory-mapped chunk in bytes.
    pub chunk_size: usize,
    /// Bytes pre-acquired at construction and parked for instant reuse.
    pub reserved_bytes: u64,
    /// Capacity of the reuse channel (raised to fit the reservation).
    pub reuse_capacity: usize,
    /// Upper bound on mapped bytes; None grows without limit.
    pub max_capacity: Option<u64>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            block_size: LARGE_BLOCK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            reserved_bytes: 0,
            reuse_capacity: DEFAULT_REUSE_CAPACITY,
            max_capacity: None,
        }
    }
}

impl PoolOptions {
    /// Create options for the given block size with default chunk size.
    ///
    /// # Arguments
    /// * `block_size` - Size of each block in bytes
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            ..Default::default()
        }
    }

    /// Set the chunk size.
    ///
    /// # Arguments
    /// * `chunk_size` - Size of each memory-mapped chunk in bytes
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the number of bytes to reserve up front.
    ///
    /// # Arguments
    /// * `reserved_bytes` - Bytes to pre-acquire at construction
    pub fn with_reserved_bytes(mut self, reserved_bytes: u64) -> Self {
        self.reserved_bytes = reserved_bytes;
        self
    }

    /// Set the reuse channel capacity.
    ///
    /// # Arguments
    /// * `reuse_capacity` - Maximum number of parked blocks
    pub fn with_reuse_capacity(mut self, reuse_capacity: usize) -> Self {
        self.reuse_capacity = reuse_capacity;
        self
    }

    /// Cap the total mapped bytes.
    ///
    /// # Arguments
    /// * `max_capacity` - Maximum bytes the pool may map across all chunks
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Number of blocks that fit in one chunk.
    pub fn blocks_per_chunk(&self) -> usize {
        if self.block_size == 0 {
            0
        } else {
            self.chunk_size / self.block_size
        }
    }

    /// Number of blocks needed to cover the reservation.
    pub fn reserved_blocks(&self) -> usize {
        if self.block_size == 0 {
            0
        } else {
            self.reserved_bytes.div_ceil(self.block_size as u64) as usize
        }
    }
}

// ============================================================================
// Smart Pool Options
// ============================================================================

/// Configuration for a tiered smart pool.
///
/// Tier order does not matter; the pool sorts tiers largest first and
/// ignores repeated block sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartPoolOptions {
    /// One entry per block size tier.
    pub tiers: Vec<PoolOptions>,
}

impl Default for SmartPoolOptions {
    fn default() -> Self {
        Self {
            tiers: vec![
                PoolOptions::new(LARGE_BLOCK_SIZE),
                PoolOptions::new(SMALL_BLOCK_SIZE),
            ],
        }
    }
}

impl SmartPoolOptions {
    /// Create options from plain block sizes with default chunk size.
    ///
    /// # Arguments
    /// * `block_sizes` - Block size of each tier in bytes
    pub fn from_block_sizes(block_sizes: &[usize]) -> Self {
        Self {
            tiers: block_sizes.iter().map(|&size| PoolOptions::new(size)).collect(),
        }
    }

    /// Add a tier.
    ///
    /// # Arguments
    /// * `tier` - Tier configuration
    pub fn with_tier(mut self, tier: PoolOptions) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Apply one chunk size to every tier.
    ///
    /// # Arguments
    /// * `chunk_size` - Size of each memory-mapped chunk in bytes
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        for tier in &mut self.tiers {
            tier.chunk_size = chunk_size;
        }
        self
    }
}
