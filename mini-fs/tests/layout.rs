use std::mem;

use mini_fs::BLOCK_SIZE;
use mini_fs::layout::{DirEntry, DiskInode, DiskParts, Header};

const CAPACITIES: [usize; 5] = [32 * 1024, 64 * 1024, 128 * 1024, 256 * 1024, 1024 * 1024];

#[test]
fn record_sizes() {
    assert_eq!(Header::SIZE, mem::size_of::<Header>());
    assert_eq!(DiskInode::SIZE, mem::size_of::<DiskInode>());
    assert_eq!(DirEntry::SIZE, mem::size_of::<DirEntry>());

    assert_eq!(5, mem::size_of::<Header>());
    assert_eq!(64, mem::size_of::<DiskInode>());
    assert_eq!(16, mem::size_of::<DirEntry>());
}

#[test]
fn regions_are_ordered_and_aligned() {
    for capacity in CAPACITIES {
        let parts = DiskParts::plan(capacity);

        assert!(parts.block_bitmap < parts.inode_bitmap);
        assert!(parts.inode_bitmap < parts.inode_table);
        assert!(parts.inode_table < parts.unused);
        assert!(parts.unused <= parts.data);
        assert!(parts.data < capacity);
        assert_eq!(0, parts.data % BLOCK_SIZE);
    }
}

#[test]
fn bitmaps_cover_their_regions() {
    for capacity in CAPACITIES {
        let parts = DiskParts::plan(capacity);

        let block_bits = (parts.inode_bitmap - parts.block_bitmap) * 8;
        let data_blocks = (capacity - parts.data) / BLOCK_SIZE;
        assert!(block_bits >= data_blocks);

        let inode_bits = (parts.inode_table - parts.inode_bitmap) * 8;
        assert!(inode_bits >= parts.inode_count());
        assert!(parts.inode_count() >= 1);
    }
}

#[test]
fn planning_is_deterministic() {
    let capacity = 1024 * 1024;
    let parts = DiskParts::plan(capacity);
    assert_eq!(parts, DiskParts::plan(capacity));

    assert_eq!(5, parts.block_bitmap);
    assert_eq!(8134, parts.inode_bitmap);
    assert_eq!(8142, parts.inode_table);
    assert_eq!(12174, parts.unused);
    assert_eq!(12176, parts.data);
    assert_eq!(63, parts.inode_count());
}
