//! Multi-block allocations and folios.

use std::fmt;

use super::block::Block;

// ============================================================================
// Allocation
// ============================================================================

/// A logical byte range backed by one or more blocks, possibly of mixed sizes.
///
/// Blocks are laid out back to back in logical order. Only the first
/// `total_size` bytes are addressable; surplus capacity in the last block is
/// never exposed. Return it with [`SmartPool::release`](super::SmartPool::release);
/// dropping an allocation frees its blocks without parking them.
pub struct Allocation {
    blocks: Vec<Block>,
    total_size: usize,
}

impl Allocation {
    pub(crate) fn new(blocks: Vec<Block>, total_size: usize) -> Self {
        debug_assert!(blocks.iter().map(Block::len).sum::<usize>() >= total_size);
        Self { blocks, total_size }
    }

    /// Logical size in bytes (exactly the requested size).
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Sum of block capacities in bytes.
    pub fn capacity(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Number of blocks backing the allocation.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks in logical order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Capacity of each block in logical order.
    pub fn block_sizes(&self) -> Vec<usize> {
        self.blocks.iter().map(Block::len).collect()
    }

    /// Take the blocks out of the allocation.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Scatter `data` across the blocks starting at logical offset 0.
    ///
    /// # Arguments
    /// * `data` - Bytes to copy in
    ///
    /// # Returns
    /// Bytes written, at most `total_size`.
    pub fn write_to_blocks(&mut self, data: &[u8]) -> usize {
        self.write_at(0, data)
    }

    /// Gather bytes from the blocks starting at logical offset 0.
    ///
    /// # Arguments
    /// * `dst` - Buffer to fill
    ///
    /// # Returns
    /// Bytes read, at most `total_size`.
    pub fn read_from_blocks(&self, dst: &mut [u8]) -> usize {
        self.read_at(0, dst)
    }

    /// Copy the whole logical range into one contiguous buffer.
    ///
    /// This allocates and copies `total_size` bytes; use sparingly and prefer
    /// [`read_from_blocks`](Self::read_from_blocks) with a caller buffer.
    pub fn contiguous_view(&self) -> Vec<u8> {
        let mut out: Vec<u8> = vec![0u8; self.total_size];
        self.read_at(0, &mut out);
        out
    }

    /// Write `data` at a logical offset.
    ///
    /// # Arguments
    /// * `offset` - Logical byte offset
    /// * `data` - Bytes to copy in
    ///
    /// # Returns
    /// Bytes written; writes past `total_size` are truncated.
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> usize {
        if offset >= self.total_size {
            return 0;
        }
        let end: usize = self.total_size.min(offset + data.len());
        let total_size: usize = self.total_size;
        let mut pos: usize = offset;
        let mut block_start: usize = 0;

        for block in self.blocks.iter_mut() {
            if pos >= end {
                break;
            }
            let block_len: usize = block.len();
            let block_end: usize = (block_start + block_len).min(total_size);
            if pos < block_end {
                let within: usize = pos - block_start;
                let n: usize = block_end.min(end) - pos;
                let src: &[u8] = &data[pos - offset..pos - offset + n];
                block.data_mut()[within..within + n].copy_from_slice(src);
                pos += n;
            }
            block_start += block_len;
        }
        pos - offset
    }

    /// Read into `dst` from a logical offset.
    ///
    /// # Arguments
    /// * `offset` - Logical byte offset
    /// * `dst` - Buffer to fill
    ///
    /// # Returns
    /// Bytes read; 0 when `offset` is at or past `total_size`.
    pub fn read_at(&self, offset: usize, dst: &mut [u8]) -> usize {
        if offset >= self.total_size {
            return 0;
        }
        let end: usize = self.total_size.min(offset + dst.len());
        let mut pos: usize = offset;
        let mut block_start: usize = 0;

        for block in &self.blocks {
            if pos >= end {
                break;
            }
            let block_end: usize = (block_start + block.len()).min(self.total_size);
            if pos < block_end {
                let within: usize = pos - block_start;
                let n: usize = block_end.min(end) - pos;
                dst[pos - offset..pos - offset + n].copy_from_slice(&block.data()[within..within + n]);
                pos += n;
            }
            block_start += block.len();
        }
        pos - offset
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("total_size", &self.total_size)
            .field("block_sizes", &self.block_sizes())
            .finish()
    }
}

// ============================================================================
// Folio
// ============================================================================

/// One block tagged with the logical file range `[start, end)` it backs.
#[derive(Debug)]
pub struct Folio {
    start: u64,
    end: u64,
    block: Block,
}

impl Folio {
    pub(crate) fn new(start: u64, end: u64, block: Block) -> Self {
        debug_assert!(end > start && (end - start) as usize <= block.len());
        Self { start, end, block }
    }

    /// First logical byte covered.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// One past the last logical byte covered.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of logical bytes covered.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Check if the folio covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Check if a logical offset falls inside this folio.
    pub fn contains(&self, offset: u64) -> bool {
        offset >= self.start && offset < self.end
    }

    /// The covered bytes.
    pub fn data(&self) -> &[u8] {
        &self.block.data()[..self.len()]
    }

    /// The covered bytes, writable.
    pub fn data_mut(&mut self) -> &mut [u8] {
        let len: usize = self.len();
        &mut self.block.data_mut()[..len]
    }

    /// Backing block.
    pub fn block(&self) -> &Block {
        &self.block
    }

    /// Take the backing block out of the folio.
    pub fn into_block(self) -> Block {
        self.block
    }
}

/// Split an allocation into folios starting at logical offset `start`.
pub(crate) fn into_folios(allocation: Allocation, start: u64) -> Vec<Folio> {
    let end: u64 = start + allocation.total_size() as u64;
    let mut cursor: u64 = start;
    let mut folios: Vec<Folio> = Vec::with_capacity(allocation.num_blocks());
    for block in allocation.into_blocks() {
        let len: u64 = (block.len() as u64).min(end - cursor);
        if len == 0 {
            continue;
        }
        folios.push(Folio::new(cursor, cursor + len, block));
        cursor += len;
    }
    folios
}
