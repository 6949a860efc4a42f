//! Block handles into pool chunks.

use std::fmt;
use std::sync::Arc;

use super::chunk::Chunk;

/// Exclusive handle to one fixed-size slot of a memory-mapped chunk.
///
/// A `Block` is not `Clone`: holding one means owning its slot, so the
/// contents can be read and written without locks. Dropping a block frees
/// its slot in the chunk bitmap; handing it to
/// [`Pool::release`](super::Pool::release) instead parks it for fast reuse.
///
/// Data is not zeroed between owners. Use
/// [`Pool::release_and_clear`](super::Pool::release_and_clear) for
/// sensitive content.
pub struct Block {
    /// Owning chunk; keeps the mapping alive.
    chunk: Arc<Chunk>,
    /// Slot index within the chunk.
    index: usize,
}

impl Block {
    /// Wrap a slot whose bit the caller has just set.
    pub(crate) fn new(chunk: Arc<Chunk>, index: usize) -> Self {
        Self { chunk, index }
    }

    /// Slot index within the owning chunk.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Identity of the pool that mapped this block.
    pub(crate) fn pool_id(&self) -> usize {
        self.chunk.pool_id()
    }

    /// Chunk number within the owning pool.
    pub fn chunk_id(&self) -> usize {
        self.chunk.id()
    }

    /// Capacity of the block in bytes.
    pub fn len(&self) -> usize {
        self.chunk.block_size()
    }

    /// Check if the block has zero capacity (never true for pool blocks).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read access to the block's bytes.
    pub fn data(&self) -> &[u8] {
        // SAFETY: this handle owns the slot's bit, so no other Block aliases
        // the range, and the chunk Arc keeps the mapping alive.
        unsafe { std::slice::from_raw_parts(self.chunk.slot_ptr(self.index), self.len()) }
    }

    /// Write access to the block's bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `data`, and `&mut self` rules out concurrent readers.
        unsafe { std::slice::from_raw_parts_mut(self.chunk.slot_ptr(self.index), self.len()) }
    }

    /// Zero the block's bytes.
    pub fn clear(&mut self) {
        self.data_mut().fill(0);
    }

    /// Check whether two handles point at the same slot.
    ///
    /// Only meaningful across time (a slot handed out, released, and handed
    /// out again), since two live handles never share a slot.
    pub fn same_slot(&self, chunk_id: usize, index: usize) -> bool {
        self.chunk.id() == chunk_id && self.index == index
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        if !self.chunk.free(self.index) {
            tracing::warn!(
                "Block {} of chunk {} was already free on drop",
                self.index,
                self.chunk.id()
            );
        }
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl AsMut<[u8]> for Block {
    fn as_mut(&mut self) -> &mut [u8] {
        self.data_mut()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("chunk", &self.chunk.id())
            .field("index", &self.index)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_read_write() {
        let chunk: Arc<Chunk> = Arc::new(Chunk::new(0, 0, 4096, 1024).unwrap());
        let index: usize = chunk.try_claim().unwrap();
        let mut block: Block = Block::new(Arc::clone(&chunk), index);

        assert_eq!(block.len(), 1024);
        block.data_mut()[..4].copy_from_slice(b"abcd");
        assert_eq!(&block.data()[..4], b"abcd");

        block.clear();
        assert!(block.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_drop_frees_slot() {
        let chunk: Arc<Chunk> = Arc::new(Chunk::new(0, 0, 2048, 1024).unwrap());
        let first: Block = Block::new(Arc::clone(&chunk), chunk.try_claim().unwrap());
        let _second: Block = Block::new(Arc::clone(&chunk), chunk.try_claim().unwrap());
        assert!(chunk.try_claim().is_none());

        let index: usize = first.index();
        drop(first);
        assert_eq!(chunk.used_blocks(), 1);
        assert_eq!(chunk.try_claim(), Some(index));
    }

    #[test]
    fn test_blocks_do_not_overlap() {
        let chunk: Arc<Chunk> = Arc::new(Chunk::new(0, 0, 4096, 1024).unwrap());
        let mut a: Block = Block::new(Arc::clone(&chunk), chunk.try_claim().unwrap());
        let mut b: Block = Block::new(Arc::clone(&chunk), chunk.try_claim().unwrap());

        a.data_mut().fill(0xAA);
        b.data_mut().fill(0xBB);
        assert!(a.data().iter().all(|&x| x == 0xAA));
        assert!(b.data().iter().all(|&x| x == 0xBB));
    }
}
