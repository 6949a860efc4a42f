//! Memory-mapped chunk carved into fixed-size block slots.

use std::fmt;
use std::ptr::NonNull;

use memmap2::MmapMut;
use parking_lot::Mutex;

use bucketfs_common::BITMAP_WORD_BITS;

use crate::error::MemoryPoolError;

/// One anonymous memory mapping subdivided into `num_blocks` slots.
///
/// Slot occupancy lives in a word-packed bitmap. A set bit means the slot
/// belongs to a live [`Block`](super::Block), either held by a caller or
/// parked in the pool's reuse channel. The mapping is released when the
/// last `Arc<Chunk>` drops, so outstanding blocks keep their memory valid
/// even after the pool is closed.
pub(crate) struct Chunk {
    /// Identity of the owning pool.
    pool_id: usize,
    /// Chunk number within its pool (for diagnostics).
    id: usize,
    /// Start of the mapping.
    base: NonNull<u8>,
    /// Size of each slot in bytes.
    block_size: usize,
    /// Number of usable slots.
    num_blocks: usize,
    /// One bit per slot, 64 slots per word.
    bitmap: Mutex<Vec<u64>>,
    /// Owns the mapping; only accessed through `base`.
    _mmap: MmapMut,
}

// SAFETY: the mapping is plain memory owned by this chunk. Slot contents are
// only reached through `Block`, which is a unique handle per set bit, and all
// bitmap access goes through the mutex.
unsafe impl Send for Chunk {}
unsafe impl Sync for Chunk {}

impl Chunk {
    /// Map a new chunk.
    ///
    /// # Arguments
    /// * `pool_id` - Identity of the owning pool
    /// * `id` - Chunk number within the pool
    /// * `chunk_size` - Size of the mapping in bytes
    /// * `block_size` - Size of each slot in bytes
    ///
    /// # Returns
    /// The chunk with every slot free.
    pub(crate) fn new(
        pool_id: usize,
        id: usize,
        chunk_size: usize,
        block_size: usize,
    ) -> Result<Self, MemoryPoolError> {
        if block_size == 0 {
            return Err(MemoryPoolError::InvalidBlockSize(block_size));
        }
        let num_blocks: usize = chunk_size / block_size;
        if num_blocks == 0 {
            return Err(MemoryPoolError::BlockLargerThanChunk {
                block_size,
                chunk_size,
            });
        }

        let mut mmap: MmapMut = MmapMut::map_anon(chunk_size)
            .map_err(|source| MemoryPoolError::ChunkAllocation { chunk_size, source })?;
        let base: NonNull<u8> = NonNull::new(mmap.as_mut_ptr()).ok_or_else(|| {
            MemoryPoolError::ChunkAllocation {
                chunk_size,
                source: std::io::Error::other("mmap returned a null mapping"),
            }
        })?;

        Ok(Self {
            pool_id,
            id,
            base,
            block_size,
            num_blocks,
            bitmap: Mutex::new(vec![0u64; num_blocks.div_ceil(BITMAP_WORD_BITS)]),
            _mmap: mmap,
        })
    }

    /// Identity of the owning pool.
    pub(crate) fn pool_id(&self) -> usize {
        self.pool_id
    }

    /// Chunk number within its pool.
    pub(crate) fn id(&self) -> usize {
        self.id
    }

    /// Size of each slot in bytes.
    pub(crate) fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of usable slots.
    pub(crate) fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Claim one free slot.
    ///
    /// # Returns
    /// The slot index, or None if every slot is taken.
    pub(crate) fn try_claim(&self) -> Option<usize> {
        let mut bitmap = self.bitmap.lock();
        self.claim_next(&mut bitmap, 0)
    }

    /// Claim up to `want` free slots in one locked pass.
    ///
    /// # Arguments
    /// * `want` - Maximum number of slots to claim
    /// * `out` - Receives the claimed slot indices
    ///
    /// # Returns
    /// Number of slots claimed.
    pub(crate) fn claim_many(&self, want: usize, out: &mut Vec<usize>) -> usize {
        let mut bitmap = self.bitmap.lock();
        let mut claimed: usize = 0;
        let mut from_word: usize = 0;
        while claimed < want {
            match self.claim_next(&mut bitmap, from_word) {
                Some(index) => {
                    out.push(index);
                    claimed += 1;
                    from_word = index / BITMAP_WORD_BITS;
                }
                None => break,
            }
        }
        claimed
    }

    /// Scan the bitmap from `from_word` for a zero bit and set it.
    fn claim_next(&self, bitmap: &mut [u64], from_word: usize) -> Option<usize> {
        for (word_index, word) in bitmap.iter_mut().enumerate().skip(from_word) {
            if *word == u64::MAX {
                continue;
            }
            let bit: usize = word.trailing_ones() as usize;
            let index: usize = word_index * BITMAP_WORD_BITS + bit;
            if index >= self.num_blocks {
                // Only the tail bits of the last word can land here.
                return None;
            }
            *word |= 1u64 << bit;
            return Some(index);
        }
        None
    }

    /// Clear the bit for a slot.
    ///
    /// # Returns
    /// True if the slot was marked in use.
    pub(crate) fn free(&self, index: usize) -> bool {
        if index >= self.num_blocks {
            return false;
        }
        let mut bitmap = self.bitmap.lock();
        let word: &mut u64 = &mut bitmap[index / BITMAP_WORD_BITS];
        let mask: u64 = 1u64 << (index % BITMAP_WORD_BITS);
        let was_set: bool = *word & mask != 0;
        *word &= !mask;
        was_set
    }

    /// Number of slots whose bit is set.
    pub(crate) fn used_blocks(&self) -> usize {
        let bitmap = self.bitmap.lock();
        bitmap.iter().map(|w: &u64| w.count_ones() as usize).sum()
    }

    /// Pointer to the first byte of a slot.
    ///
    /// Callers must hold the slot's bit.
    pub(crate) fn slot_ptr(&self, index: usize) -> *mut u8 {
        debug_assert!(index < self.num_blocks);
        // SAFETY: index < num_blocks, so the offset stays inside the mapping.
        unsafe { self.base.as_ptr().add(index * self.block_size) }
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("id", &self.id)
            .field("block_size", &self.block_size)
            .field("num_blocks", &self.num_blocks)
            .field("used_blocks", &self.used_blocks())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KB: usize = 1024;

    #[test]
    fn test_chunk_rejects_zero_block_size() {
        let result = Chunk::new(0, 0, 64 * KB, 0);
        assert!(matches!(result, Err(MemoryPoolError::InvalidBlockSize(0))));
    }

    #[test]
    fn test_chunk_rejects_block_larger_than_chunk() {
        let result = Chunk::new(0, 0, 64 * KB, 128 * KB);
        assert!(matches!(
            result,
            Err(MemoryPoolError::BlockLargerThanChunk { .. })
        ));
    }

    #[test]
    fn test_claim_until_full() {
        // 100 slots spans two bitmap words with a partial tail.
        let chunk: Chunk = Chunk::new(0, 0, 100 * KB, KB).unwrap();
        assert_eq!(chunk.num_blocks(), 100);

        let mut seen: Vec<usize> = Vec::new();
        while let Some(index) = chunk.try_claim() {
            seen.push(index);
        }
        assert_eq!(seen.len(), 100);
        assert_eq!(seen, (0..100).collect::<Vec<usize>>());
        assert_eq!(chunk.used_blocks(), 100);
    }

    #[test]
    fn test_free_makes_slot_claimable_again() {
        let chunk: Chunk = Chunk::new(0, 0, 8 * KB, KB).unwrap();
        let mut out: Vec<usize> = Vec::new();
        assert_eq!(chunk.claim_many(8, &mut out), 8);
        assert!(chunk.try_claim().is_none());

        assert!(chunk.free(3));
        assert!(!chunk.free(3), "double free reports the slot was not set");
        assert_eq!(chunk.try_claim(), Some(3));
    }

    #[test]
    fn test_claim_many_stops_at_capacity() {
        let chunk: Chunk = Chunk::new(0, 0, 4 * KB, KB).unwrap();
        let mut out: Vec<usize> = Vec::new();
        assert_eq!(chunk.claim_many(10, &mut out), 4);
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_free_out_of_range_is_ignored() {
        let chunk: Chunk = Chunk::new(0, 0, 4 * KB, KB).unwrap();
        assert!(!chunk.free(4));
        assert!(!chunk.free(1000));
    }
}
