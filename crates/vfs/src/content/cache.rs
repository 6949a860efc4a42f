//! Path-addressed content cache over a [`PathTrie`] and a [`SmartPool`].

use std::sync::Arc;

use crate::error::VfsError;
use crate::memory_pool::{Allocation, SmartPool, SmartPoolStats};
use crate::trie::{FileInfo, PathTrie};

use super::resident::CachedContent;

/// In-process file cache keyed by object path.
///
/// Metadata lives in a [`PathTrie`]; content bytes live in blocks from a
/// shared [`SmartPool`]. Evicting a file releases its blocks but keeps its
/// node so the path still lists as a directory entry; removing it deletes
/// the node and prunes emptied directories.
///
/// # Example
///
/// ```ignore
/// let pool = Arc::new(SmartPool::new(&[MIB, 64 * KIB])?);
/// let cache = ContentCache::new(pool);
/// cache.store("assets/tex/a.png", &bytes)?;
/// let n = cache.read("assets/tex/a.png", 0, &mut buf)?;
/// ```
pub struct ContentCache {
    trie: PathTrie,
    pool: Arc<SmartPool>,
}

impl ContentCache {
    /// Create an empty cache drawing blocks from `pool`.
    pub fn new(pool: Arc<SmartPool>) -> Self {
        Self {
            trie: PathTrie::new(),
            pool,
        }
    }

    /// Cache `data` as the content of `path`.
    ///
    /// Replaces any file already at `path` and returns its blocks to the pool.
    /// Empty data is stored as metadata only.
    ///
    /// # Arguments
    /// * `path` - Slash-delimited file path
    /// * `data` - Full file content
    ///
    /// # Returns
    /// Metadata now stored at `path`.
    pub fn store(&self, path: &str, data: &[u8]) -> Result<Arc<FileInfo>, VfsError> {
        let mut info: FileInfo = FileInfo::new(data.len() as u64);
        if !data.is_empty() {
            let mut allocation: Allocation = self.pool.allocate(data.len())?;
            allocation.write_to_blocks(data);
            info = info.with_content(Arc::new(CachedContent::new(allocation)));
        }

        let info: Arc<FileInfo> = Arc::new(info);
        if let Some(previous) = self.trie.insert(path, Arc::clone(&info)) {
            self.release_content(&previous);
        }
        tracing::trace!("Cached {} ({} bytes)", path, data.len());
        Ok(info)
    }

    /// Read cached content into `buf` starting at `offset`.
    ///
    /// # Arguments
    /// * `path` - Slash-delimited file path
    /// * `offset` - Byte offset into the file
    /// * `buf` - Destination buffer
    ///
    /// # Returns
    /// Bytes read; 0 at or past end of file.
    pub fn read(&self, path: &str, offset: u64, buf: &mut [u8]) -> Result<usize, VfsError> {
        let info: Arc<FileInfo> = self
            .trie
            .get(path)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))?;
        if offset >= info.size || buf.is_empty() {
            return Ok(0);
        }

        let content: &Arc<CachedContent> = info
            .content
            .as_ref()
            .ok_or_else(|| VfsError::Evicted(path.to_string()))?;
        content
            .read_at(offset as usize, buf)
            .ok_or_else(|| VfsError::Evicted(path.to_string()))
    }

    /// Metadata for the file at `path`.
    pub fn stat(&self, path: &str) -> Result<Arc<FileInfo>, VfsError> {
        self.trie
            .get(path)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))
    }

    /// Check whether `path` exists as a file or directory.
    pub fn exists(&self, path: &str) -> bool {
        self.trie.path_exists(path)
    }

    /// Create an empty directory entry.
    pub fn mkdir(&self, path: &str) {
        self.trie.insert_dir(path);
    }

    /// Drop the file at `path` and release its blocks, keeping the node.
    ///
    /// # Returns
    /// True if a file was evicted.
    pub fn evict(&self, path: &str) -> bool {
        match self.trie.delete_file(path) {
            Some(info) => {
                self.release_content(&info);
                tracing::debug!("Evicted {}", path);
                true
            }
            None => false,
        }
    }

    /// Remove the file at `path`, release its blocks and prune empty directories.
    ///
    /// # Returns
    /// True if a file was removed.
    pub fn remove(&self, path: &str) -> bool {
        match self.trie.delete(path) {
            Some(info) => {
                self.release_content(&info);
                true
            }
            None => false,
        }
    }

    /// Move a file or directory. Content stays in place.
    ///
    /// # Returns
    /// True on success; see [`PathTrie::move_path`] for the failure cases.
    pub fn rename(&self, source: &str, dest: &str) -> bool {
        self.trie.move_path(source, dest)
    }

    /// Cached file paths at or below `prefix`, sorted.
    pub fn list(&self, prefix: &str) -> Option<Vec<String>> {
        self.trie.list_paths_with_prefix(prefix)
    }

    /// Number of cached files.
    pub fn file_count(&self) -> usize {
        self.trie.count_files()
    }

    /// Block usage of the backing pool.
    pub fn pool_stats(&self) -> SmartPoolStats {
        self.pool.stats()
    }

    fn release_content(&self, info: &FileInfo) {
        if let Some(allocation) = info.content.as_ref().and_then(|c| c.take()) {
            self.pool.release(allocation);
        }
    }
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("files", &self.trie.count_files())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use bucketfs_common::{KIB, MIB};

    use super::*;
    use crate::options::SmartPoolOptions;

    fn cache() -> ContentCache {
        let options: SmartPoolOptions =
            SmartPoolOptions::from_block_sizes(&[64 * KIB, MIB]).with_chunk_size(8 * MIB);
        ContentCache::new(Arc::new(SmartPool::with_options(options).unwrap()))
    }

    #[test]
    fn test_store_and_read() {
        let cache: ContentCache = cache();
        let data: Vec<u8> = (0..200 * 1024).map(|i| (i % 251) as u8).collect();
        cache.store("a/b.bin", &data).unwrap();

        let mut buf: Vec<u8> = vec![0u8; data.len()];
        assert_eq!(cache.read("a/b.bin", 0, &mut buf).unwrap(), data.len());
        assert_eq!(buf, data);

        let mut tail: Vec<u8> = vec![0u8; 100];
        let n: usize = cache.read("a/b.bin", (data.len() - 10) as u64, &mut tail).unwrap();
        assert_eq!(n, 10);
        assert_eq!(&tail[..10], &data[data.len() - 10..]);
        assert_eq!(cache.read("a/b.bin", data.len() as u64, &mut tail).unwrap(), 0);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let cache: ContentCache = cache();
        let mut buf: [u8; 4] = [0; 4];
        assert!(matches!(
            cache.read("nope", 0, &mut buf),
            Err(VfsError::NotFound(_))
        ));
        assert!(matches!(cache.stat("nope"), Err(VfsError::NotFound(_))));
    }

    #[test]
    fn test_empty_file() {
        let cache: ContentCache = cache();
        let info: Arc<FileInfo> = cache.store("empty", b"").unwrap();
        assert_eq!(info.size, 0);
        assert!(info.content.is_none());

        let mut buf: [u8; 4] = [0; 4];
        assert_eq!(cache.read("empty", 0, &mut buf).unwrap(), 0);
        assert_eq!(cache.pool_stats().used_blocks(), 0);
    }

    #[test]
    fn test_overwrite_releases_previous_blocks() {
        let cache: ContentCache = cache();
        let first: Arc<FileInfo> = cache.store("f", &vec![1u8; 300 * 1024]).unwrap();
        cache.store("f", b"small").unwrap();

        assert!(!first.is_resident());
        assert_eq!(cache.pool_stats().used_blocks(), 1);
        assert_eq!(cache.file_count(), 1);

        let mut buf: [u8; 5] = [0; 5];
        cache.read("f", 0, &mut buf).unwrap();
        assert_eq!(&buf, b"small");
    }

    #[test]
    fn test_evict_keeps_node_and_releases_blocks() {
        let cache: ContentCache = cache();
        let info: Arc<FileInfo> = cache.store("d/f", b"hello").unwrap();
        assert!(info.is_resident());

        assert!(cache.evict("d/f"));
        assert!(!info.is_resident());
        assert!(cache.exists("d/f"));
        assert_eq!(cache.file_count(), 0);
        assert_eq!(cache.pool_stats().used_blocks(), 0);
        assert!(!cache.evict("d/f"));

        let mut buf: [u8; 5] = [0; 5];
        assert!(matches!(cache.read("d/f", 0, &mut buf), Err(VfsError::NotFound(_))));
    }

    #[test]
    fn test_reader_holding_metadata_sees_evicted() {
        let cache: ContentCache = cache();
        let info: Arc<FileInfo> = cache.store("f", b"hello").unwrap();
        cache.evict("f");

        let content: &Arc<CachedContent> = info.content.as_ref().unwrap();
        let mut buf: [u8; 5] = [0; 5];
        assert!(content.read_at(0, &mut buf).is_none());
    }

    #[test]
    fn test_remove_prunes() {
        let cache: ContentCache = cache();
        cache.store("x/y/z", b"data").unwrap();
        assert!(cache.remove("x/y/z"));
        assert!(!cache.exists("x"));
        assert_eq!(cache.pool_stats().used_blocks(), 0);
        assert!(!cache.remove("x/y/z"));
    }

    #[test]
    fn test_rename_and_list() {
        let cache: ContentCache = cache();
        cache.store("src/a", b"a").unwrap();
        cache.store("src/b", b"b").unwrap();
        cache.mkdir("dst");

        assert!(cache.rename("src", "dst/moved"));
        assert_eq!(
            cache.list("dst").unwrap(),
            vec!["dst/moved/a", "dst/moved/b"]
        );
        let mut buf: [u8; 1] = [0];
        cache.read("dst/moved/b", 0, &mut buf).unwrap();
        assert_eq!(&buf, b"b");
        assert!(cache.list("src").is_none());
    }
}
