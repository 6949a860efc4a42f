//! In-memory content caching.
//!
//! Combines the path trie (metadata) with the smart pool (bytes):
//!
//! ```text
//! ContentCache
//!   ├── PathTrie ── FileInfo ── Arc<CachedContent>
//!   └── Arc<SmartPool>                 │
//!         └── Pool tiers ◄── Allocation┘ (released on evict/remove)
//! ```

mod cache;
mod resident;

pub use cache::ContentCache;
pub use resident::CachedContent;
