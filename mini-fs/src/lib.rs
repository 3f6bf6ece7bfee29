//! # mini-fs
//!
//! 固定容量存储设备上的极简层次文件系统：
//! 定长索引节点记录、位图式空闲管理、纯直接索引，
//! 目录即“内容为目录项数组的文件”。
//!
//! 磁盘线性布局，自低地址向高地址：
//! 文件头 | 数据块位图 | 索引节点位图 | 索引节点表 | 数据区
//!
//! 单进程独占设备，本层不做缓存，
//! 每次操作都直接往返设备，设备即唯一事实。

#![no_std]

extern crate alloc;

// 索引节点层：路径解析与创建、整读整写、列目录等操作
mod fs;
pub use fs::Vfs;

// 磁盘管理器层：布局、空闲管理与索引节点表
mod mfs;
pub use mfs::MiniFileSystem;

// 磁盘数据结构层：表示磁盘文件系统的数据结构
pub mod layout;

// 路径工具
mod path;

pub use block_dev::BlockDevice;

pub const MAGIC: [u8; 4] = *b"MNFS";
pub const VERSION: u8 = 1;
/// 数据块大小（字节）
pub const BLOCK_SIZE: usize = 16;
/// 索引节点密度：每多少字节设备空间配一个索引节点槽位
pub const BYTES_PER_INODE: usize = 16 * 1024;
