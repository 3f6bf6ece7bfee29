//! # 磁盘管理器层
//!
//! 推导磁盘布局，管理两张位图与索引节点表，
//! 并在此之上提供块数调整、目录项追加与整读整写。

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use block_dev::BlockDevice;
use spin::Mutex;
use vfs::Error;

use crate::BLOCK_SIZE;
use crate::layout::*;

pub struct MiniFileSystem {
    block_device: Arc<dyn BlockDevice>,
    parts: DiskParts,
    block_bitmap: Bitmap,
    inode_bitmap: Bitmap,
}

impl MiniFileSystem {
    /// 打开设备上的文件系统。
    ///
    /// 读不到合法文件头时就地格式化；这是唯一允许在未初始化
    /// 状态下运行的操作。已初始化的设备原样打开，内容不动。
    pub fn open(block_device: Arc<dyn BlockDevice>) -> Arc<Mutex<Self>> {
        let parts = DiskParts::plan(block_device.capacity());
        let mut mfs = Self {
            block_bitmap: Bitmap::new(parts.block_bitmap),
            inode_bitmap: Bitmap::new(parts.inode_bitmap),
            parts,
            block_device,
        };

        let mut header = Header::default();
        mfs.block_device.read_at(0, header.as_bytes_mut());
        if !header.is_valid() {
            log::info!("no valid filesystem on device, formatting");
            mfs.format();
        }

        Arc::new(Mutex::new(mfs))
    }

    /// 格式化：写入新文件头，一次清零两张位图，创建根目录。
    /// 设备上原有的内容全部作废。
    pub fn format(&mut self) {
        let mut header = Header::default();
        header.init();
        self.block_device.write_at(0, header.as_bytes());

        // 两张位图相邻，合并成一次整体写
        let zeroes = vec![0; self.parts.inode_table - self.parts.block_bitmap];
        self.block_device.write_at(self.parts.block_bitmap, &zeroes);

        // 根目录固定占用0号索引节点
        assert_eq!(self.alloc_inode(), 0);
        let mut root = DiskInode::default();
        root.init(0, DiskInodeKind::Directory);
        self.write_inode(&root);
    }

    /// 分配新的索引节点，返回其ID
    #[inline]
    pub fn alloc_inode(&mut self) -> u32 {
        self.inode_bitmap.alloc(&self.block_device)
    }

    /// 分配新的数据块，返回其设备字节地址
    #[inline]
    pub fn alloc_block(&mut self) -> u32 {
        self.parts.data as u32 + self.block_bitmap.alloc(&self.block_device) * BLOCK_SIZE as u32
    }

    /// 归还数据块：地址逆映射回位序号后清位
    pub fn dealloc_block(&mut self, addr: u32) {
        let bit = (addr - self.parts.data as u32) / BLOCK_SIZE as u32;
        self.block_bitmap.dealloc(&self.block_device, bit);
    }

    /// 索引节点的磁盘字节地址：表首 + ID × 记录大小。
    /// 不做存在性检查，调用者保证ID已被分配。
    #[inline]
    pub fn inode_addr(&self, id: u32) -> usize {
        self.parts.inode_table + id as usize * DiskInode::SIZE
    }

    pub fn read_inode(&self, id: u32) -> DiskInode {
        let mut inode = DiskInode::default();
        self.block_device
            .read_at(self.inode_addr(id), inode.as_bytes_mut());

        inode
    }

    pub fn write_inode(&self, inode: &DiskInode) {
        self.block_device
            .write_at(self.inode_addr(inode.id), inode.as_bytes());
    }

    #[inline]
    pub fn root_inode(&self) -> DiskInode {
        self.read_inode(0)
    }

    /// 调整索引节点指向的块数以容纳`new_size`：
    /// 增长时在尾部补新块，收缩时自尾部归还多余的块。
    ///
    /// 超出直接索引容量即报 [`Error::FileTooLarge`]，
    /// 此时位图与索引都未被改动；`size`字段由调用者自行更新。
    pub fn resize(&mut self, inode: &mut DiskInode, new_size: u64) -> Result<(), Error> {
        let required = DiskInode::count_blocks(new_size);
        if required > DIRECT_COUNT {
            return Err(Error::FileTooLarge);
        }

        let used = inode.used_blocks();
        if required > used {
            let new_blocks = (used..required).map(|_| self.alloc_block()).collect();
            inode.extend(new_blocks);
        } else {
            for addr in inode.truncate_to(required) {
                self.dealloc_block(addr);
            }
        }

        Ok(())
    }

    /// 往目录内容的末尾追加一条目录项：
    /// 按需扩容，自当前内容末尾写入（可能跨块），最后落盘目录的索引节点
    pub fn append_entry(&mut self, dir: &mut DiskInode, entry: &DirEntry) -> Result<(), Error> {
        let end = dir.size as usize;

        self.resize(dir, (end + DirEntry::SIZE) as u64)?;
        dir.size += DirEntry::SIZE as u64;
        dir.write_at(end, entry.as_bytes(), &self.block_device);
        self.write_inode(dir);

        Ok(())
    }

    /// 读出全部内容：各块按序拼接，末块按余量截断
    pub fn read_all(&self, inode: &DiskInode) -> Vec<u8> {
        let mut buf = vec![0; inode.size as usize];
        inode.read_at(0, &mut buf, &self.block_device);

        buf
    }

    /// 以`data`整体替换内容：先精确调整块数并更新`size`，
    /// 再逐块写入，最后落盘索引节点
    pub fn write_all(&mut self, inode: &mut DiskInode, data: &[u8]) -> Result<(), Error> {
        self.resize(inode, data.len() as u64)?;
        inode.size = data.len() as u64;
        inode.write_at(0, data, &self.block_device);
        self.write_inode(inode);

        Ok(())
    }
}
