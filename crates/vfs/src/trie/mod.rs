//! Concurrent path trie for object-store listings.
//!
//! # Structure
//!
//! ```text
//! root ("")
//!   ├── assets/
//!   │     ├── tex/
//!   │     │     └── a.png   [FileInfo]
//!   │     └── b.obj         [FileInfo]
//!   └── scene.blend         [FileInfo]
//! ```
//!
//! Every node carries its own reader-writer lock. Lookups take one read
//! lock at a time on the way down; writers lock a parent and then at most
//! one child. Directories exist implicitly as interior nodes and disappear
//! once the last file beneath them is deleted or moved away.

mod info;
mod node;
mod path_trie;

pub use info::FileInfo;
pub use path_trie::PathTrie;
