//! Cached file metadata stored at trie leaves.

use std::sync::Arc;
use std::time::SystemTime;

use crate::content::CachedContent;

/// Cached metadata for one file.
///
/// Stored behind an `Arc` once inserted; moving a path relocates the node
/// holding it, never a copy.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Last access time.
    pub atime: SystemTime,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Last metadata change time.
    pub ctime: SystemTime,
    /// File size in bytes.
    pub size: u64,
    /// Cached content, if any is resident in the block pool.
    pub content: Option<Arc<CachedContent>>,
}

impl FileInfo {
    /// Create metadata for a file of the given size with all timestamps set to now.
    ///
    /// # Arguments
    /// * `size` - File size in bytes
    pub fn new(size: u64) -> Self {
        let now: SystemTime = SystemTime::now();
        Self {
            atime: now,
            mtime: now,
            ctime: now,
            size,
            content: None,
        }
    }

    /// Attach cached content.
    ///
    /// # Arguments
    /// * `content` - Resident content handle
    pub fn with_content(mut self, content: Arc<CachedContent>) -> Self {
        self.content = Some(content);
        self
    }

    /// Set the modification time (and change time to match).
    ///
    /// # Arguments
    /// * `mtime` - Modification time
    pub fn with_mtime(mut self, mtime: SystemTime) -> Self {
        self.mtime = mtime;
        self.ctime = mtime;
        self
    }

    /// Check if content is attached and still resident.
    pub fn is_resident(&self) -> bool {
        self.content.as_ref().is_some_and(|c| c.is_resident())
    }
}
