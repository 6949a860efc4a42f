//! Integration tests for the tiered memory pool and the content cache.

use std::sync::Arc;
use std::thread;

use bucketfs_common::{KIB, MIB};
use bucketfs_vfs::{
    Allocation, Block, ContentCache, Folio, MemoryPoolError, Pool, PoolOptions, SmartPool,
    SmartPoolOptions, VfsError,
};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("bucketfs_vfs=debug")
        .try_init();
}

/// Two-tier pool on small chunks to keep the maps light.
fn smart_pool() -> SmartPool {
    let options: SmartPoolOptions =
        SmartPoolOptions::from_block_sizes(&[MIB, 64 * KIB]).with_chunk_size(8 * MIB);
    SmartPool::with_options(options).unwrap()
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}

// ============================================================================
// Pool
// ============================================================================

#[test]
fn test_pool_threads_never_share_a_block() {
    init_tracing();
    let pool: Pool = Pool::with_options(PoolOptions::new(4 * KIB).with_chunk_size(256 * KIB)).unwrap();

    thread::scope(|s| {
        for t in 0..8u8 {
            let pool: &Pool = &pool;
            s.spawn(move || {
                for _ in 0..200 {
                    let mut block: Block = pool.acquire().unwrap();
                    block.data_mut().fill(t);
                    thread::yield_now();
                    assert!(block.data().iter().all(|&b| b == t));
                    pool.release(block);
                }
            });
        }
    });

    assert_eq!(pool.stats().used_blocks, 0);
}

#[test]
fn test_pool_close_keeps_held_blocks_valid() {
    let pool: Pool = Pool::with_options(PoolOptions::new(4 * KIB).with_chunk_size(64 * KIB)).unwrap();
    let mut held: Block = pool.acquire().unwrap();

    pool.close().unwrap();
    held.data_mut()[0] = 7;
    assert_eq!(held.data()[0], 7);
    assert!(matches!(pool.acquire(), Err(MemoryPoolError::PoolClosed)));
    assert!(matches!(pool.close(), Err(MemoryPoolError::PoolClosed)));
}

// ============================================================================
// SmartPool
// ============================================================================

#[test]
fn test_allocate_100kb_uses_two_small_blocks() {
    let pool: SmartPool = smart_pool();
    let allocation: Allocation = pool.allocate(100 * KIB).unwrap();

    assert_eq!(allocation.total_size(), 100 * KIB);
    assert_eq!(allocation.block_sizes(), vec![64 * KIB, 64 * KIB]);
    pool.release(allocation);
}

#[test]
fn test_allocate_mixed_tiers_round_trip() {
    let pool: SmartPool = smart_pool();
    let size: usize = 2 * MIB + 130 * KIB + 3;
    let data: Vec<u8> = pattern(size);

    let mut allocation: Allocation = pool.allocate(size).unwrap();
    assert_eq!(
        allocation.block_sizes(),
        vec![MIB, MIB, 64 * KIB, 64 * KIB, 64 * KIB]
    );
    assert_eq!(allocation.write_to_blocks(&data), size);
    assert_eq!(allocation.contiguous_view(), data);

    let mut middle: Vec<u8> = vec![0u8; 200 * KIB];
    let n: usize = allocation.read_at(MIB - 100, &mut middle);
    assert_eq!(n, middle.len());
    assert_eq!(&middle[..], &data[MIB - 100..MIB - 100 + 200 * KIB]);

    pool.release(allocation);
    assert_eq!(pool.stats().used_blocks(), 0);
}

#[test]
fn test_allocate_zero_fails_without_side_effects() {
    let pool: SmartPool = smart_pool();
    let before: usize = pool.stats().used_blocks();
    assert!(matches!(pool.allocate(0), Err(MemoryPoolError::InvalidSize(0))));
    assert_eq!(pool.stats().used_blocks(), before);
}

#[test]
fn test_folios_cover_range_contiguously() {
    let pool: SmartPool = smart_pool();
    let start: u64 = 10 * MIB as u64;
    let end: u64 = start + (MIB + 300 * KIB) as u64;

    let folios: Vec<Folio> = pool.allocate_folios(start, end).unwrap();
    assert_eq!(folios.first().unwrap().start(), start);
    assert_eq!(folios.last().unwrap().end(), end);
    for pair in folios.windows(2) {
        assert_eq!(pair[0].end(), pair[1].start());
    }
    let covered: usize = folios.iter().map(Folio::len).sum();
    assert_eq!(covered as u64, end - start);

    pool.release_folios(folios);
    assert_eq!(pool.stats().used_blocks(), 0);
}

#[test]
fn test_concurrent_allocations_are_isolated() {
    let pool: SmartPool = smart_pool();

    thread::scope(|s| {
        for t in 0..6usize {
            let pool: &SmartPool = &pool;
            s.spawn(move || {
                for round in 0..20usize {
                    let size: usize = 50 * KIB + t * 97 * KIB + round * 13;
                    let data: Vec<u8> = vec![(t * 20 + round) as u8; size];
                    let mut allocation: Allocation = pool.allocate(size).unwrap();
                    allocation.write_to_blocks(&data);
                    assert_eq!(allocation.contiguous_view(), data);
                    pool.release(allocation);
                }
            });
        }
    });

    assert_eq!(pool.stats().used_blocks(), 0);
}

// ============================================================================
// ContentCache
// ============================================================================

#[test]
fn test_content_cache_lifecycle() {
    init_tracing();
    let pool: Arc<SmartPool> = Arc::new(smart_pool());
    let cache: ContentCache = ContentCache::new(Arc::clone(&pool));
    let data: Vec<u8> = pattern(MIB + 5);

    cache.store("jobs/42/input.bin", &data).unwrap();
    assert!(pool.stats().used_blocks() > 0);

    let mut buf: Vec<u8> = vec![0u8; data.len()];
    assert_eq!(cache.read("jobs/42/input.bin", 0, &mut buf).unwrap(), data.len());
    assert_eq!(buf, data);

    assert!(cache.rename("jobs/42", "done/42"));
    assert!(cache.read("done/42/input.bin", 0, &mut buf).is_ok());
    assert!(matches!(
        cache.read("jobs/42/input.bin", 0, &mut buf),
        Err(VfsError::NotFound(_))
    ));

    assert!(cache.remove("done/42/input.bin"));
    assert!(!cache.exists("done"));
    assert_eq!(cache.file_count(), 0);
    assert_eq!(pool.stats().used_blocks(), 0);
}

#[test]
fn test_content_cache_concurrent_store() {
    let pool: Arc<SmartPool> = Arc::new(smart_pool());
    let cache: ContentCache = ContentCache::new(Arc::clone(&pool));

    thread::scope(|s| {
        for t in 0..4usize {
            let cache: &ContentCache = &cache;
            s.spawn(move || {
                for i in 0..25usize {
                    let body: Vec<u8> = vec![(t + i) as u8; 10 * KIB + i];
                    cache.store(&format!("w{}/f{}", t, i), &body).unwrap();
                }
            });
        }
    });

    assert_eq!(cache.file_count(), 100);
    let mut buf: Vec<u8> = vec![0u8; 10 * KIB + 24];
    let n: usize = cache.read("w3/f24", 0, &mut buf).unwrap();
    assert_eq!(n, 10 * KIB + 24);
    assert!(buf.iter().all(|&b| b == 27));

    for t in 0..4usize {
        for i in 0..25usize {
            assert!(cache.evict(&format!("w{}/f{}", t, i)));
        }
    }
    assert_eq!(pool.stats().used_blocks(), 0);
}
