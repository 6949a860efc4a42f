//! Pool-backed file content attached to trie leaves.

use std::fmt;

use parking_lot::RwLock;

use crate::memory_pool::Allocation;

/// File bytes held in pool blocks.
///
/// The allocation can be taken out exactly once (on eviction or removal);
/// after that the handle reports itself as no longer resident and reads
/// return None. Metadata referencing this handle may outlive the bytes.
pub struct CachedContent {
    allocation: RwLock<Option<Allocation>>,
    len: usize,
}

impl CachedContent {
    /// Wrap a filled allocation.
    ///
    /// # Arguments
    /// * `allocation` - Blocks holding exactly `total_size` bytes of content
    pub fn new(allocation: Allocation) -> Self {
        let len: usize = allocation.total_size();
        Self {
            allocation: RwLock::new(Some(allocation)),
            len,
        }
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the content has zero length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the bytes are still held.
    pub fn is_resident(&self) -> bool {
        self.allocation.read().is_some()
    }

    /// Copy bytes starting at `offset` into `dst`.
    ///
    /// # Returns
    /// Bytes read, or None if the content was taken.
    pub fn read_at(&self, offset: usize, dst: &mut [u8]) -> Option<usize> {
        let guard = self.allocation.read();
        guard.as_ref().map(|allocation| allocation.read_at(offset, dst))
    }

    /// Take the allocation out so its blocks can be released.
    pub fn take(&self) -> Option<Allocation> {
        self.allocation.write().take()
    }
}

impl fmt::Debug for CachedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedContent")
            .field("len", &self.len)
            .field("resident", &self.is_resident())
            .finish()
    }
}
