//! In-memory primitives for a bucket-backed virtual filesystem.
//!
//! This crate provides the metadata index and block memory that a
//! filesystem front-end over an object store sits on. Object paths are
//! indexed in a concurrent trie; file bytes live in fixed-size blocks carved
//! from large anonymous memory maps.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: ContentCache (store, read, evict, rename)
//! Layer 1: PathTrie (metadata)     SmartPool (tiered blocks)
//! Layer 0: TrieNode locks          Pool → Chunk → Block
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bucketfs_vfs::{ContentCache, SmartPool};
//!
//! let pool = Arc::new(SmartPool::new(&[MIB, 64 * KIB])?);
//! let cache = ContentCache::new(pool);
//! cache.store("renders/frame_0001.exr", &bytes)?;
//! ```

pub mod content;
pub mod error;
pub mod memory_pool;
pub mod options;
pub mod trie;

pub use content::{CachedContent, ContentCache};
pub use error::{MemoryPoolError, VfsError};
pub use memory_pool::{
    Allocation, Block, Folio, Pool, PoolStats, SmartPool, SmartPoolStats,
};
pub use options::{PoolOptions, SmartPoolOptions};
pub use trie::{FileInfo, PathTrie};
