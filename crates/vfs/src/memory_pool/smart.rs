//! Tiered pool that combines block sizes to cover arbitrary byte lengths.

use bucketfs_common::SMALL_REQUEST_BLOCK_MULTIPLIER;

use super::allocation::{into_folios, Allocation, Folio};
use super::block::Block;
use super::pool::{Pool, PoolStats};
use crate::error::MemoryPoolError;
use crate::options::{PoolOptions, SmartPoolOptions};

/// Statistics for every tier of a smart pool, largest block size first.
#[derive(Debug, Clone, Default)]
pub struct SmartPoolStats {
    /// Per-tier statistics.
    pub tiers: Vec<PoolStats>,
}

impl SmartPoolStats {
    /// Total mapped bytes across tiers.
    pub fn total_capacity(&self) -> u64 {
        self.tiers.iter().map(|t| t.total_capacity).sum()
    }

    /// Bytes held by callers across tiers.
    pub fn used_bytes(&self) -> u64 {
        self.tiers.iter().map(PoolStats::used_bytes).sum()
    }

    /// Blocks held by callers across tiers.
    pub fn used_blocks(&self) -> usize {
        self.tiers.iter().map(|t| t.used_blocks).sum()
    }
}

/// Set of fixed-block pools, ordered from largest to smallest block size.
///
/// Requests are packed greedily with the largest blocks first, which keeps
/// the block count (and per-block bookkeeping) low for large reads. Small
/// requests come from the smallest tier alone so a tiny file never pins a
/// large block.
///
/// # Usage
///
/// ```ignore
/// let pool = SmartPool::new(&[MIB, 64 * KIB])?;
/// let mut allocation = pool.allocate(3 * MIB + 100)?;
/// allocation.write_to_blocks(&data);
/// pool.release(allocation);
/// ```
#[derive(Debug)]
pub struct SmartPool {
    /// Non-empty, strictly decreasing block sizes.
    pools: Vec<Pool>,
}

impl SmartPool {
    /// Create a smart pool with one tier per block size and default chunk size.
    ///
    /// # Arguments
    /// * `block_sizes` - Block size of each tier in bytes (any order)
    pub fn new(block_sizes: &[usize]) -> Result<Self, MemoryPoolError> {
        Self::with_options(SmartPoolOptions::from_block_sizes(block_sizes))
    }

    /// Create a smart pool with a per-tier reservation.
    ///
    /// # Arguments
    /// * `tiers` - `(block_size, reserved_bytes)` for each tier
    pub fn with_reserved(tiers: &[(usize, u64)]) -> Result<Self, MemoryPoolError> {
        Self::with_options(SmartPoolOptions {
            tiers: tiers
                .iter()
                .map(|&(block_size, reserved)| {
                    PoolOptions::new(block_size).with_reserved_bytes(reserved)
                })
                .collect(),
        })
    }

    /// Create a smart pool from explicit options.
    ///
    /// Tiers are sorted largest first; repeated block sizes keep the first
    /// configuration seen.
    ///
    /// # Arguments
    /// * `options` - Tier configurations
    pub fn with_options(options: SmartPoolOptions) -> Result<Self, MemoryPoolError> {
        let mut tiers: Vec<PoolOptions> = options.tiers;
        if tiers.is_empty() {
            return Err(MemoryPoolError::NoTiers);
        }
        tiers.sort_by(|a, b| b.block_size.cmp(&a.block_size));
        tiers.dedup_by_key(|t| t.block_size);

        let pools: Vec<Pool> = tiers
            .into_iter()
            .map(Pool::with_options)
            .collect::<Result<Vec<Pool>, MemoryPoolError>>()?;
        tracing::debug!(
            "Smart pool tiers: {:?}",
            pools.iter().map(Pool::block_size).collect::<Vec<usize>>()
        );
        Ok(Self { pools })
    }

    /// Block sizes of all tiers, largest first.
    pub fn block_sizes(&self) -> Vec<usize> {
        self.pools.iter().map(Pool::block_size).collect()
    }

    /// Pool serving a given block size.
    pub fn pool_for(&self, block_size: usize) -> Option<&Pool> {
        self.pools.iter().find(|p| p.block_size() == block_size)
    }

    fn smallest(&self) -> &Pool {
        // Construction guarantees at least one tier.
        &self.pools[self.pools.len() - 1]
    }

    /// Allocate blocks covering exactly `size` logical bytes.
    ///
    /// With several tiers, a request under four smallest blocks is served by
    /// the smallest tier alone. Otherwise tiers are walked largest first,
    /// taking as many whole blocks as fit, and the remainder is rounded up to
    /// smallest-tier blocks. On failure every block already taken is
    /// returned.
    ///
    /// # Arguments
    /// * `size` - Requested size in bytes (must be positive)
    pub fn allocate(&self, size: usize) -> Result<Allocation, MemoryPoolError> {
        if size == 0 {
            return Err(MemoryPoolError::InvalidSize(size));
        }

        let smallest: &Pool = self.smallest();
        let small_size: usize = smallest.block_size();
        if self.pools.len() > 1 && size < SMALL_REQUEST_BLOCK_MULTIPLIER * small_size {
            let blocks: Vec<Block> = smallest.acquire_batch(size.div_ceil(small_size))?;
            return Ok(Allocation::new(blocks, size));
        }

        let mut blocks: Vec<Block> = Vec::new();
        let mut remaining: usize = size;
        for pool in &self.pools {
            let count: usize = remaining / pool.block_size();
            if count == 0 {
                continue;
            }
            match pool.acquire_batch(count) {
                Ok(mut acquired) => {
                    blocks.append(&mut acquired);
                    remaining -= count * pool.block_size();
                }
                Err(e) => {
                    self.release_blocks(blocks);
                    return Err(e);
                }
            }
        }
        if remaining > 0 {
            match smallest.acquire_batch(remaining.div_ceil(small_size)) {
                Ok(mut acquired) => blocks.append(&mut acquired),
                Err(e) => {
                    self.release_blocks(blocks);
                    return Err(e);
                }
            }
        }

        Ok(Allocation::new(blocks, size))
    }

    /// Allocate from a single tier when `size` is an exact multiple of its block size.
    ///
    /// Tiers are tried largest first; falls back to [`allocate`](Self::allocate).
    ///
    /// # Arguments
    /// * `size` - Requested size in bytes (must be positive)
    pub fn allocate_exact(&self, size: usize) -> Result<Allocation, MemoryPoolError> {
        if size == 0 {
            return Err(MemoryPoolError::InvalidSize(size));
        }
        match self.pools.iter().find(|p| size % p.block_size() == 0) {
            Some(pool) => {
                let blocks: Vec<Block> = pool.acquire_batch(size / pool.block_size())?;
                Ok(Allocation::new(blocks, size))
            }
            None => self.allocate(size),
        }
    }

    /// Allocate folios covering the logical range `[start, end)`.
    ///
    /// The first folio starts at `start`, the last ends at `end`, and each
    /// folio starts where the previous one ended.
    ///
    /// # Arguments
    /// * `start` - First logical byte
    /// * `end` - One past the last logical byte (must exceed `start`)
    pub fn allocate_folios(&self, start: u64, end: u64) -> Result<Vec<Folio>, MemoryPoolError> {
        let size: usize = end.saturating_sub(start) as usize;
        let allocation: Allocation = self.allocate(size)?;
        Ok(into_folios(allocation, start))
    }

    /// Return every block of an allocation to the tier matching its size.
    ///
    /// # Arguments
    /// * `allocation` - Allocation produced by this pool
    pub fn release(&self, allocation: Allocation) {
        self.release_blocks(allocation.into_blocks());
    }

    /// Return folios to their tiers.
    ///
    /// # Arguments
    /// * `folios` - Folios produced by [`allocate_folios`](Self::allocate_folios)
    pub fn release_folios(&self, folios: Vec<Folio>) {
        self.release_blocks(folios.into_iter().map(Folio::into_block).collect());
    }

    fn release_blocks(&self, blocks: Vec<Block>) {
        for block in blocks {
            match self.pools.iter().find(|p| p.id() == block.pool_id()) {
                Some(pool) => pool.release(block),
                None => {
                    tracing::warn!("Block of {} bytes is not from this pool; freeing", block.len());
                }
            }
        }
    }

    /// Snapshot statistics for every tier.
    pub fn stats(&self) -> SmartPoolStats {
        SmartPoolStats {
            tiers: self.pools.iter().map(Pool::stats).collect(),
        }
    }

    /// Close every tier.
    ///
    /// All tiers are closed even if one fails; the first error is returned.
    pub fn close(&self) -> Result<(), MemoryPoolError> {
        let mut first_error: Option<MemoryPoolError> = None;
        for pool in &self.pools {
            if let Err(e) = pool.close() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
