use core::mem;

use crate::layout::{DiskInode, Header};
use crate::{BLOCK_SIZE, BYTES_PER_INODE};

const INODE_SIZE: usize = mem::size_of::<DiskInode>();
const BITS_PER_BYTE: usize = 8;

/// 各磁盘区域的起始字节偏移。
///
/// 由设备容量唯一确定，不持久化，打开时重新推导。
///
/// 不变式：区域按字段声明顺序排列、两两不相交；
/// `data` 对齐到块大小；
/// 索引节点表大小 = 槽位数 × 记录大小。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskParts {
    /// 数据块位图
    pub block_bitmap: usize,
    /// 索引节点位图
    pub inode_bitmap: usize,
    /// 索引节点表
    pub inode_table: usize,
    /// 表尾，到`data`之间是对齐留下的空隙
    pub unused: usize,
    /// 数据区
    pub data: usize,
}

impl DiskParts {
    /// 由设备容量推导布局。
    ///
    /// 纯函数，无I/O也无错误路径：调用者保证容量不低于可行下限
    /// （至少装得下一个索引节点槽位），低于下限时结果未定义。
    pub fn plan(capacity: usize) -> Self {
        let block_bitmap = Header::SIZE;
        let mut inode_bitmap = block_bitmap;

        // 位图字节自身也消耗可寻址空间：每吃满一个块大小的位图字节，
        // 待覆盖的块数就自减一，以此收敛到自洽的定点
        let mut blocks = (capacity - Header::SIZE) / BLOCK_SIZE;
        while (inode_bitmap - block_bitmap) * BITS_PER_BYTE < blocks {
            if (inode_bitmap - block_bitmap) % BLOCK_SIZE == 0 {
                blocks -= 1;
            }
            inode_bitmap += 1;
        }

        // 余下空间按密度折算出索引节点槽位数
        let inodes = (capacity - inode_bitmap) / BYTES_PER_INODE;
        let inode_table = inode_bitmap + inodes.div_ceil(BITS_PER_BYTE);
        let unused = inode_table + inodes * INODE_SIZE;

        // 数据区上取整到块边界
        let data = unused.next_multiple_of(BLOCK_SIZE);

        Self {
            block_bitmap,
            inode_bitmap,
            inode_table,
            unused,
            data,
        }
    }

    /// 索引节点槽位总数
    #[inline]
    pub fn inode_count(&self) -> usize {
        (self.unused - self.inode_table) / INODE_SIZE
    }
}
