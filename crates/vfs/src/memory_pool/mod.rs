//! Tiered fixed-block memory pool backing cached file content.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SmartPool                             │
//! │   pools: [Pool(1MB), Pool(64KB), ...]   (largest first)      │
//! └───────────────┬─────────────────────────────────────────────┘
//!                 │
//! ┌───────────────▼─────────────────────────────────────────────┐
//! │  Pool                                                        │
//! │    inner: RwLock<{ chunks: Vec<Arc<Chunk>>, capacity }>      │
//! │    reuse channel: bounded crossbeam queue of parked Blocks   │
//! └───────────────┬─────────────────────────────────────────────┘
//!                 │
//! ┌───────────────▼─────────────────────────────────────────────┐
//! │  Chunk: 128MB anonymous mmap + Mutex<bitmap> (64 slots/word) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`Block`] owns one chunk slot; its bit stays set while a caller holds
//! it or while it is parked in the reuse channel, and is cleared when the
//! block is dropped. An [`Allocation`] groups blocks of possibly different
//! tiers into one logical byte range; a [`Folio`] tags a block with the file
//! range it backs.

mod allocation;
mod block;
mod chunk;
mod pool;
mod smart;

pub use allocation::{Allocation, Folio};
pub use block::Block;
pub use pool::{Pool, PoolStats};
pub use smart::{SmartPool, SmartPoolStats};
