//! Fixed-block-size pool over growable memory-mapped chunks.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;

use bucketfs_common::{CHUNK_PREFILL_MAX_BLOCKS, CHUNK_PREFILL_PERCENT};

use super::block::Block;
use super::chunk::Chunk;
use crate::error::MemoryPoolError;
use crate::options::PoolOptions;

/// Source of pool identities, so blocks can be matched to the pool that mapped them.
static NEXT_POOL_ID: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Pool Stats
// ============================================================================

/// Statistics about a pool's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Size of each block in bytes.
    pub block_size: usize,
    /// Number of mapped chunks.
    pub chunk_count: usize,
    /// Total number of block slots across all chunks.
    pub total_blocks: usize,
    /// Blocks held by callers.
    pub used_blocks: usize,
    /// Blocks parked in the reuse channel.
    pub parked_blocks: usize,
    /// Slots free in the chunk bitmaps.
    pub free_blocks: usize,
    /// Total mapped bytes.
    pub total_capacity: u64,
    /// Bytes reserved at construction.
    pub reserved_bytes: u64,
    /// Acquisitions served from the reuse channel.
    pub fast_path_hits: u64,
    /// Acquisitions served by a bitmap scan.
    pub bitmap_allocations: u64,
}

impl PoolStats {
    /// Calculate pool utilization as a percentage of mapped slots held by callers.
    pub fn utilization(&self) -> f64 {
        if self.total_blocks == 0 {
            0.0
        } else {
            (self.used_blocks as f64 / self.total_blocks as f64) * 100.0
        }
    }

    /// Bytes currently held by callers.
    pub fn used_bytes(&self) -> u64 {
        (self.used_blocks * self.block_size) as u64
    }
}

// ============================================================================
// Pool Inner
// ============================================================================

/// Chunk list and capacity bookkeeping, guarded by the pool lock.
#[derive(Debug, Default)]
struct PoolInner {
    /// Mapped chunks in creation order.
    chunks: Vec<Arc<Chunk>>,
    /// Total mapped bytes.
    total_capacity: u64,
    /// Bytes reserved at construction.
    reserved_bytes: u64,
}

// ============================================================================
// Pool (Public API)
// ============================================================================

/// Thread-safe pool of fixed-size blocks.
///
/// Blocks are carved out of large anonymous memory maps ("chunks"). The pool
/// grows by one chunk whenever every slot is taken and never shrinks until
/// [`close`](Self::close).
///
/// # Thread Safety
///
/// - Recently released blocks are parked in a bounded channel and handed
///   out again without touching a bitmap (fast path)
/// - The pool lock guards the chunk list; each chunk's lock guards its
///   bitmap. Locks are always taken pool first, chunk second
pub struct Pool {
    /// Process-unique identity stamped into every chunk.
    id: usize,
    /// Size of each block in bytes.
    block_size: usize,
    /// Size of each chunk in bytes.
    chunk_size: usize,
    /// Upper bound on mapped bytes.
    max_capacity: Option<u64>,
    inner: RwLock<PoolInner>,
    /// Fast-path queue of parked blocks (bits stay set while parked).
    reuse_tx: Sender<Block>,
    reuse_rx: Receiver<Block>,
    next_chunk_id: AtomicUsize,
    closed: AtomicBool,
    fast_path_hits: AtomicU64,
    bitmap_allocations: AtomicU64,
}

impl Pool {
    /// Create a pool with the default chunk size.
    ///
    /// # Arguments
    /// * `block_size` - Size of each block in bytes
    /// * `reserved_bytes` - Bytes to pre-acquire and park for instant reuse (0 for none)
    pub fn new(block_size: usize, reserved_bytes: u64) -> Result<Self, MemoryPoolError> {
        Self::with_options(PoolOptions::new(block_size).with_reserved_bytes(reserved_bytes))
    }

    /// Create a pool from explicit options.
    ///
    /// Maps one initial chunk. With a reservation, enough blocks are
    /// acquired (growing more chunks as needed) and parked so they are
    /// available without further chunk growth.
    ///
    /// # Arguments
    /// * `options` - Block size, chunk size, reservation and channel capacity
    pub fn with_options(options: PoolOptions) -> Result<Self, MemoryPoolError> {
        if options.block_size == 0 {
            return Err(MemoryPoolError::InvalidBlockSize(options.block_size));
        }
        if options.block_size > options.chunk_size {
            return Err(MemoryPoolError::BlockLargerThanChunk {
                block_size: options.block_size,
                chunk_size: options.chunk_size,
            });
        }

        let reserved_blocks: usize = options.reserved_blocks();
        let capacity: usize = options.reuse_capacity.max(reserved_blocks).max(1);
        let (reuse_tx, reuse_rx) = crossbeam_channel::bounded(capacity);

        let pool = Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            block_size: options.block_size,
            chunk_size: options.chunk_size,
            max_capacity: options.max_capacity,
            inner: RwLock::new(PoolInner::default()),
            reuse_tx,
            reuse_rx,
            next_chunk_id: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            fast_path_hits: AtomicU64::new(0),
            bitmap_allocations: AtomicU64::new(0),
        };
        pool.grow()?;

        if reserved_blocks > 0 {
            let blocks: Vec<Block> = pool.acquire_batch(reserved_blocks)?;
            for block in blocks {
                pool.park(block);
            }
            pool.inner.write().reserved_bytes = (reserved_blocks * pool.block_size) as u64;
            tracing::debug!(
                "Reserved {} blocks of {} bytes",
                reserved_blocks,
                pool.block_size
            );
        }

        Ok(pool)
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    /// Size of each block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Size of each chunk in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Check if the pool has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Acquire one block.
    ///
    /// Parked blocks are returned first. Otherwise the chunk bitmaps are
    /// scanned, and if every chunk is full a new chunk is mapped and the
    /// scan retried once.
    ///
    /// # Returns
    /// An exclusive block handle. Contents are whatever the previous owner left.
    pub fn acquire(&self) -> Result<Block, MemoryPoolError> {
        self.ensure_open()?;

        if let Some(block) = self.take_parked() {
            return Ok(block);
        }
        if let Some(block) = self.claim_from_chunks() {
            return Ok(block);
        }

        let chunk: Arc<Chunk> = self.grow()?;
        if let Some(index) = chunk.try_claim() {
            self.bitmap_allocations.fetch_add(1, Ordering::Relaxed);
            return Ok(Block::new(chunk, index));
        }

        // Concurrent callers drained the new chunk; one more look before giving up.
        if let Some(block) = self.take_parked() {
            return Ok(block);
        }
        self.claim_from_chunks()
            .ok_or(MemoryPoolError::Exhausted {
                block_size: self.block_size,
            })
    }

    /// Acquire `count` blocks in as few locked passes as possible.
    ///
    /// Drains parked blocks first, then claims several bits per chunk under
    /// one lock, growing chunks until satisfied. If growth fails every block
    /// gathered so far is released before the error is returned.
    ///
    /// # Arguments
    /// * `count` - Number of blocks to acquire
    pub fn acquire_batch(&self, count: usize) -> Result<Vec<Block>, MemoryPoolError> {
        self.ensure_open()?;

        let mut blocks: Vec<Block> = Vec::with_capacity(count);
        self.drain_parked(count, &mut blocks);
        if blocks.len() < count {
            let inner = self.inner.read();
            for chunk in &inner.chunks {
                let need: usize = count - blocks.len();
                if need == 0 {
                    break;
                }
                self.claim_batch_from(chunk, need, &mut blocks);
            }
        }

        while blocks.len() < count {
            let chunk: Arc<Chunk> = match self.grow() {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.release_all(blocks);
                    return Err(e);
                }
            };
            let before: usize = blocks.len();
            self.drain_parked(count - blocks.len(), &mut blocks);
            let need: usize = count - blocks.len();
            self.claim_batch_from(&chunk, need, &mut blocks);
            if blocks.len() == before {
                self.release_all(blocks);
                return Err(MemoryPoolError::Exhausted {
                    block_size: self.block_size,
                });
            }
        }

        Ok(blocks)
    }

    /// Return a block to the pool.
    ///
    /// The block is parked for fast reuse. If the reuse channel is full it
    /// is freed in its chunk bitmap instead, where a later scan finds it.
    /// Contents are left as-is. A block mapped by another pool is freed in
    /// its own chunk and never parked here, even if its size matches.
    ///
    /// # Arguments
    /// * `block` - Block previously acquired from this pool
    pub fn release(&self, block: Block) {
        if block.pool_id() != self.id {
            tracing::warn!(
                "Releasing {} byte block from pool {} into pool {}; freeing instead",
                block.len(),
                block.pool_id(),
                self.id
            );
            return;
        }
        if self.is_closed() {
            return;
        }
        self.park(block);
    }

    /// Zero a block's contents, then return it to the pool.
    ///
    /// # Arguments
    /// * `block` - Block previously acquired from this pool
    pub fn release_and_clear(&self, mut block: Block) {
        block.clear();
        self.release(block);
    }

    /// Snapshot pool statistics by counting bitmap bits in every chunk.
    ///
    /// Walks all chunks; intended for diagnostics, not the hot path.
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.read();
        let total_blocks: usize = inner.chunks.iter().map(|c| c.num_blocks()).sum();
        let set_bits: usize = inner.chunks.iter().map(|c| c.used_blocks()).sum();
        let parked_blocks: usize = self.reuse_rx.len();

        PoolStats {
            block_size: self.block_size,
            chunk_count: inner.chunks.len(),
            total_blocks,
            used_blocks: set_bits.saturating_sub(parked_blocks),
            parked_blocks,
            free_blocks: total_blocks.saturating_sub(set_bits),
            total_capacity: inner.total_capacity,
            reserved_bytes: inner.reserved_bytes,
            fast_path_hits: self.fast_path_hits.load(Ordering::Relaxed),
            bitmap_allocations: self.bitmap_allocations.load(Ordering::Relaxed),
        }
    }

    /// Close the pool.
    ///
    /// Detaches every chunk and drops parked blocks. Each chunk is unmapped
    /// once the last block still held by a caller is dropped, so outstanding
    /// handles stay valid. Later acquisitions fail with `PoolClosed`.
    pub fn close(&self) -> Result<(), MemoryPoolError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(MemoryPoolError::PoolClosed);
        }

        let chunks: Vec<Arc<Chunk>> = {
            let mut inner = self.inner.write();
            inner.total_capacity = 0;
            inner.reserved_bytes = 0;
            std::mem::take(&mut inner.chunks)
        };
        let mut parked: usize = 0;
        while let Ok(block) = self.reuse_rx.try_recv() {
            drop(block);
            parked += 1;
        }

        tracing::debug!(
            "Closed {} byte pool: {} chunks detached, {} parked blocks dropped",
            self.block_size,
            chunks.len(),
            parked
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn ensure_open(&self) -> Result<(), MemoryPoolError> {
        if self.is_closed() {
            Err(MemoryPoolError::PoolClosed)
        } else {
            Ok(())
        }
    }

    /// Pop one parked block.
    fn take_parked(&self) -> Option<Block> {
        let block: Block = self.reuse_rx.try_recv().ok()?;
        self.fast_path_hits.fetch_add(1, Ordering::Relaxed);
        Some(block)
    }

    /// Pop up to `want` parked blocks into `out`.
    fn drain_parked(&self, want: usize, out: &mut Vec<Block>) {
        for _ in 0..want {
            match self.take_parked() {
                Some(block) => out.push(block),
                None => break,
            }
        }
    }

    /// Park a block, freeing it if the channel is full.
    ///
    /// # Returns
    /// True if the block was parked.
    fn park(&self, block: Block) -> bool {
        match self.reuse_tx.try_send(block) {
            Ok(()) => true,
            Err(err) => {
                // Dropping the block clears its bit.
                drop(err.into_inner());
                false
            }
        }
    }

    fn release_all(&self, blocks: Vec<Block>) {
        for block in blocks {
            self.release(block);
        }
    }

    /// Scan existing chunks for one free slot.
    fn claim_from_chunks(&self) -> Option<Block> {
        let inner = self.inner.read();
        for chunk in &inner.chunks {
            if let Some(index) = chunk.try_claim() {
                self.bitmap_allocations.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Claimed block {} from chunk {}", index, chunk.id());
                return Some(Block::new(Arc::clone(chunk), index));
            }
        }
        None
    }

    fn claim_batch_from(&self, chunk: &Arc<Chunk>, want: usize, out: &mut Vec<Block>) {
        let mut indices: Vec<usize> = Vec::with_capacity(want);
        let claimed: usize = chunk.claim_many(want, &mut indices);
        self.bitmap_allocations
            .fetch_add(claimed as u64, Ordering::Relaxed);
        out.extend(
            indices
                .into_iter()
                .map(|index| Block::new(Arc::clone(chunk), index)),
        );
    }

    /// Map a new chunk, append it, and pre-park a share of its blocks.
    fn grow(&self) -> Result<Arc<Chunk>, MemoryPoolError> {
        self.ensure_open()?;

        if let Some(max_capacity) = self.max_capacity {
            if self.inner.read().total_capacity + self.chunk_size as u64 > max_capacity {
                return Err(MemoryPoolError::CapacityExceeded { max_capacity });
            }
        }

        let id: usize = self.next_chunk_id.fetch_add(1, Ordering::Relaxed);
        let chunk: Arc<Chunk> =
            Arc::new(Chunk::new(self.id, id, self.chunk_size, self.block_size)?);
        {
            let mut inner = self.inner.write();
            // A concurrent close wins; the fresh mapping is dropped here.
            if self.is_closed() {
                return Err(MemoryPoolError::PoolClosed);
            }
            if let Some(max_capacity) = self.max_capacity {
                if inner.total_capacity + self.chunk_size as u64 > max_capacity {
                    return Err(MemoryPoolError::CapacityExceeded { max_capacity });
                }
            }
            inner.chunks.push(Arc::clone(&chunk));
            inner.total_capacity += self.chunk_size as u64;
        }
        tracing::debug!(
            "Mapped chunk {} ({} blocks of {} bytes)",
            id,
            chunk.num_blocks(),
            self.block_size
        );

        let prefill: usize =
            CHUNK_PREFILL_MAX_BLOCKS.min(chunk.num_blocks() * CHUNK_PREFILL_PERCENT / 100);
        let mut indices: Vec<usize> = Vec::with_capacity(prefill);
        chunk.claim_many(prefill, &mut indices);
        for index in indices {
            self.park(Block::new(Arc::clone(&chunk), index));
        }

        Ok(chunk)
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("block_size", &self.block_size)
            .field("chunk_size", &self.chunk_size)
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
