//! 索引节点与纯直接索引
//!
//! `direct` 表内存放数据块的**设备字节地址**，按使用顺序紧排，
//! 首个0就是已用范围的末尾；合法状态下0不会夹在中间，
//! 非零地址个数恒等于 `size.div_ceil(BLOCK_SIZE)`。
//! 没有任何间接层，表容量即文件大小的硬上限。

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::{ptr, slice};

use block_dev::BlockDevice;

use crate::BLOCK_SIZE;

/// 直接索引的块地址数量
pub const DIRECT_COUNT: usize = 12;

/// 索引节点：描述一个文件或目录的定长元信息记录
#[derive(Debug, Default)]
#[repr(C)]
pub struct DiskInode {
    /// ID，亦为位图序号与表内槽位
    pub id: u32,
    /// 类型
    pub kind: DiskInodeKind,
    // 不用usize是为了严控布局
    pub size: u64,
    /// 直接索引
    direct: [u32; DIRECT_COUNT],
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum DiskInodeKind {
    #[default]
    File,
    Directory,
}

impl DiskInode {
    /// 记录大小恒为64字节
    pub const SIZE: usize = 64;
    /// 文件大小上限（字节），超出即容量错误
    pub const MAX_SIZE: usize = DIRECT_COUNT * BLOCK_SIZE;

    #[inline]
    pub fn init(&mut self, id: u32, kind: DiskInodeKind) {
        *self = Self {
            id,
            kind,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == DiskInodeKind::Directory
    }

    /// 容纳指定数据量所需的数据块数
    #[inline]
    pub fn count_blocks(size: u64) -> usize {
        (size as usize).div_ceil(BLOCK_SIZE)
    }

    /// 已用的直接索引项数：首个0地址标出范围末尾
    pub fn used_blocks(&self) -> usize {
        self.direct
            .iter()
            .position(|&addr| addr == 0)
            .unwrap_or(DIRECT_COUNT)
    }

    /// 把新块地址依次补到已用范围末尾
    pub(crate) fn extend(&mut self, new_blocks: Vec<u32>) {
        let mut used = self.used_blocks();
        for addr in new_blocks {
            self.direct[used] = addr;
            used += 1;
        }
    }

    /// 自尾部收缩到恰好`keep`块，清零腾出的槽位并返回其中的块地址
    pub(crate) fn truncate_to(&mut self, keep: usize) -> Vec<u32> {
        let used = self.used_blocks();
        let freed = self.direct[keep..used].to_vec();
        self.direct[keep..used].fill(0);

        freed
    }

    /// 从指定位置（字节偏移）读出数据填充`buf`，返回读出的字节数。
    ///
    /// 读取范围被`size`截断。内容既无长度前缀也无终止符，
    /// 把内容当文本的调用者需自备终止约定。
    pub fn read_at(&self, offset: usize, buf: &mut [u8], device: &Arc<dyn BlockDevice>) -> usize {
        let mut start = offset;
        let end = (start + buf.len()).min(self.size as usize);

        if start >= end {
            return 0;
        }

        let mut read_size = 0;
        loop {
            // 当前块的逻辑索引
            let block_index = start / BLOCK_SIZE;
            // 当前块内可读到的末地址（字节）
            let current_block_end = ((block_index + 1) * BLOCK_SIZE).min(end);
            let block_read_size = current_block_end - start;

            // 块地址 + 块内偏移 = 设备地址
            let addr = self.direct[block_index] as usize + start % BLOCK_SIZE;
            device.read_at(addr, &mut buf[read_size..read_size + block_read_size]);

            read_size += block_read_size;

            if current_block_end == end {
                break;
            }

            start = current_block_end;
        }

        read_size
    }

    /// 把`buf`写到指定位置（字节偏移），返回写入的字节数。
    ///
    /// 写入范围被`size`截断，调用者须先扩好容并更新`size`。
    /// 落点临近块尾时写入会被拆开，单条记录可以横跨两个块。
    pub fn write_at(&mut self, offset: usize, buf: &[u8], device: &Arc<dyn BlockDevice>) -> usize {
        let mut start = offset;
        let end = (start + buf.len()).min(self.size as usize);

        assert!(start <= end);
        if start == end {
            return 0;
        }

        let mut written_size = 0;
        loop {
            let block_index = start / BLOCK_SIZE;
            let current_block_end = ((block_index + 1) * BLOCK_SIZE).min(end);
            let block_write_size = current_block_end - start;

            let addr = self.direct[block_index] as usize + start % BLOCK_SIZE;
            device.write_at(addr, &buf[written_size..written_size + block_write_size]);

            written_size += block_write_size;

            if current_block_end == end {
                break;
            }

            start = current_block_end;
        }

        written_size
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(ptr::from_ref(self).cast(), Self::SIZE) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(ptr::from_mut(self).cast(), Self::SIZE) }
    }
}
