use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use block_dev::BlockDevice;
use mini_fs::Vfs;
use mini_fs::layout::{Bitmap, DiskInode, DiskParts};
use vfs::{DirEntryType, Error, StatKind};

use crate::BlockFile;

const CAPACITY: usize = 1024 * 1024;

fn image(name: &str) -> PathBuf {
    env::temp_dir().join(format!("mini-fs-{}-{name}.img", process::id()))
}

fn fresh(name: &str) -> (Vfs, Arc<BlockFile>) {
    let raw = Arc::new(BlockFile::create(image(name), CAPACITY).unwrap());
    (Vfs::new(raw.clone()), raw)
}

#[test]
fn bitmap_alloc_then_dealloc_restores_bytes() {
    let device: Arc<dyn BlockDevice> =
        Arc::new(BlockFile::create(image("bitmap-restore"), CAPACITY).unwrap());
    let bitmap = Bitmap::new(64);

    // 预置一些已占用的位
    device.write_at(64, &[0xff, 0b0000_0111]);
    let mut before = [0; 4];
    device.read_at(64, &mut before);

    let bit = bitmap.alloc(&device);
    assert_eq!(11, bit);
    bitmap.dealloc(&device, bit);

    let mut after = [0; 4];
    device.read_at(64, &mut after);
    assert_eq!(before, after);
}

#[test]
fn allocations_are_pairwise_distinct() {
    let device: Arc<dyn BlockDevice> =
        Arc::new(BlockFile::create(image("bitmap-distinct"), CAPACITY).unwrap());
    let bitmap = Bitmap::new(0);

    let allocated: Vec<u32> = (0..100).map(|_| bitmap.alloc(&device)).collect();

    // 无交错释放时恰为最低位优先的序列，自然两两不同
    assert_eq!((0..100).collect::<Vec<u32>>(), allocated);
}

#[test]
fn content_roundtrip() {
    let (fs, _) = fresh("roundtrip");
    fs.create("/hello", DirEntryType::Regular).unwrap();

    for len in [0, 1, 15, 16, 17, 100, DiskInode::MAX_SIZE] {
        let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
        fs.set_content("/hello", &data).unwrap();
        assert_eq!(data, fs.content("/hello").unwrap());
    }
}

#[test]
fn oversized_content_is_rejected_before_mutation() {
    let (fs, _) = fresh("oversized");
    fs.create("/f", DirEntryType::Regular).unwrap();
    fs.set_content("/f", b"keep me").unwrap();

    let huge = vec![7; DiskInode::MAX_SIZE + 1];
    assert!(matches!(fs.set_content("/f", &huge), Err(Error::FileTooLarge)));
    assert_eq!(b"keep me".to_vec(), fs.content("/f").unwrap());
}

#[test]
fn listing_nested_directories() {
    let (fs, _) = fresh("listing");
    fs.create("/a", DirEntryType::Regular).unwrap();
    fs.create("/b", DirEntryType::Directory).unwrap();
    fs.create("/b/c", DirEntryType::Regular).unwrap();
    fs.set_content("/a", &[9; 20]).unwrap();

    let root = fs.read_dir("/").unwrap();
    assert_eq!(2, root.len());
    assert_eq!("a", root[0].name);
    assert_eq!(DirEntryType::Regular, root[0].ty);
    assert_eq!(20, root[0].size);
    assert_eq!("b", root[1].name);
    assert_eq!(DirEntryType::Directory, root[1].ty);

    let b = fs.read_dir("/b").unwrap();
    assert_eq!(1, b.len());
    assert_eq!("c", b[0].name);
    assert_eq!(DirEntryType::Regular, b[0].ty);
}

#[test]
fn shrinking_releases_trailing_blocks() {
    let (fs, raw) = fresh("shrink");
    let parts = DiskParts::plan(CAPACITY);
    let block_bitmap = |raw: &Arc<BlockFile>| {
        let mut bytes = [0; 2];
        raw.read_at(parts.block_bitmap, &mut bytes);
        bytes
    };

    // 根目录1块 + 文件7块
    fs.create("/f", DirEntryType::Regular).unwrap();
    fs.set_content("/f", &[1; 100]).unwrap();
    assert_eq!([0xff, 0x00], block_bitmap(&raw));

    // 收缩到1块，尾部6块回到位图
    fs.set_content("/f", &[2; 10]).unwrap();
    assert_eq!([0x03, 0x00], block_bitmap(&raw));

    // 释放的序号立刻可被复用
    fs.create("/g", DirEntryType::Regular).unwrap();
    fs.set_content("/g", &[3; 100]).unwrap();
    assert_eq!([0xff, 0x03], block_bitmap(&raw));

    assert_eq!(vec![2; 10], fs.content("/f").unwrap());
    assert_eq!(vec![3; 100], fs.content("/g").unwrap());
}

#[test]
fn reopen_preserves_content() {
    let path = image("reopen");
    {
        let device = Arc::new(BlockFile::create(&path, CAPACITY).unwrap());
        let fs = Vfs::new(device);
        fs.create("/persist", DirEntryType::Regular).unwrap();
        fs.set_content("/persist", b"still here").unwrap();
    }

    // 第二次构造找到合法文件头，不会重新格式化
    let device = Arc::new(BlockFile::open(&path).unwrap());
    let fs = Vfs::new(device);
    assert_eq!(b"still here".to_vec(), fs.content("/persist").unwrap());
}

#[test]
fn format_resets_to_single_empty_root() {
    let (fs, _) = fresh("format");
    fs.create("/junk", DirEntryType::Regular).unwrap();
    fs.set_content("/junk", b"gone soon").unwrap();

    fs.format();

    assert!(fs.read_dir("/").unwrap().is_empty());
    assert!(matches!(fs.content("/junk"), Err(Error::NotFound)));

    let root = fs.stat("/").unwrap();
    assert_eq!(StatKind::DIR, root.kind);
    assert_eq!(0, root.size);
    assert_eq!(0, root.blocks);
}

#[test]
fn path_errors_are_explicit() {
    let (fs, _) = fresh("errors");
    fs.create("/dir", DirEntryType::Directory).unwrap();
    fs.create("/file", DirEntryType::Regular).unwrap();

    assert!(matches!(fs.content("/missing"), Err(Error::NotFound)));
    assert!(matches!(
        fs.create("/missing/x", DirEntryType::Regular),
        Err(Error::NotFound)
    ));
    assert!(matches!(
        fs.create("/file/x", DirEntryType::Regular),
        Err(Error::NotADirectory)
    ));
    assert!(matches!(fs.content("/file/x"), Err(Error::NotADirectory)));
    assert!(matches!(fs.content("/dir"), Err(Error::IsADirectory)));
    assert!(matches!(fs.set_content("/dir", b"no"), Err(Error::IsADirectory)));
    assert!(matches!(fs.read_dir("/file"), Err(Error::NotADirectory)));
    assert!(matches!(
        fs.create("/file", DirEntryType::Regular),
        Err(Error::AlreadyExists)
    ));
    assert!(matches!(
        fs.create("/", DirEntryType::Directory),
        Err(Error::AlreadyExists)
    ));
    assert!(matches!(
        fs.create("/much-too-long-name", DirEntryType::Regular),
        Err(Error::NameTooLong)
    ));
    assert!(matches!(fs.content("relative"), Err(Error::NotFound)));
}

#[test]
fn stat_reports_kind_and_blocks() {
    let (fs, _) = fresh("stat");
    fs.create("/f", DirEntryType::Regular).unwrap();
    fs.set_content("/f", &[5; 33]).unwrap();

    let stat = fs.stat("/f").unwrap();
    assert_eq!(StatKind::FILE, stat.kind);
    assert_eq!(33, stat.size);
    assert_eq!(3, stat.blocks);
    assert_eq!(16, stat.block_size);
}
