//! # 索引节点层
//!
//! 面向调用者的文件系统接口：以绝对路径定位文件系统项，
//! 提供创建、整读整写与列目录操作。
//!
//! 路径解析自根目录起逐段下行，在目录内容里线性扫描名字；
//! 树形结构只增不删，不存在环，无需环检测。

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use block_dev::BlockDevice;
use spin::Mutex;
use vfs::{DirEntryType, Error, Stat, StatKind};

use crate::BLOCK_SIZE;
use crate::MiniFileSystem;
use crate::layout::{DirEntry, DiskInode, DiskInodeKind, NAME_MAX_LEN};
use crate::path::Path;

/// 文件系统实例的单一持有者句柄。
///
/// 设备句柄归实例所有，随实例一起释放。
pub struct Vfs {
    fs: Arc<Mutex<MiniFileSystem>>,
}

impl Vfs {
    /// 打开设备；设备上没有合法实例时就地格式化一个
    pub fn new(block_device: Arc<dyn BlockDevice>) -> Self {
        Self {
            fs: MiniFileSystem::open(block_device),
        }
    }

    /// 重新格式化：设备退回到只剩一个空根目录的状态
    pub fn format(&self) {
        self.fs.lock().format();
    }

    /// 在已存在的父目录下创建文件或子目录
    pub fn create(&self, path: &str, ty: DirEntryType) -> Result<(), Error> {
        let mut fs = self.fs.lock();

        if !path.is_absolute() {
            return Err(Error::NotFound);
        }
        // 根目录永远存在
        let (parent, name) = path.parent_file().ok_or(Error::AlreadyExists)?;
        if name.len() > NAME_MAX_LEN {
            return Err(Error::NameTooLong);
        }

        let mut dir = Self::resolve(&fs, parent)?;
        if !dir.is_dir() {
            return Err(Error::NotADirectory);
        }
        if Self::lookup(&fs, &dir, name).is_some() {
            return Err(Error::AlreadyExists);
        }

        let mut inode = DiskInode::default();
        inode.init(fs.alloc_inode(), ty.into());
        fs.write_inode(&inode);

        fs.append_entry(&mut dir, &DirEntry::new(name, inode.id))
    }

    /// 取出文件的全部内容，原样返回，不附加终止符
    pub fn content(&self, path: &str) -> Result<Vec<u8>, Error> {
        let fs = self.fs.lock();

        let inode = Self::resolve(&fs, path)?;
        if inode.is_dir() {
            return Err(Error::IsADirectory);
        }

        Ok(fs.read_all(&inode))
    }

    /// 以`content`整体替换文件内容。
    ///
    /// 内容超出大小上限时整个操作中止，文件保持原内容可读。
    pub fn set_content(&self, path: &str, content: &[u8]) -> Result<(), Error> {
        let mut fs = self.fs.lock();

        let mut inode = Self::resolve(&fs, path)?;
        if inode.is_dir() {
            return Err(Error::IsADirectory);
        }

        fs.write_all(&mut inode, content)
    }

    /// 列出目录下的全部项，每一项都回读子索引节点以带出类型与大小
    pub fn read_dir(&self, path: &str) -> Result<Vec<vfs::DirEntry>, Error> {
        let fs = self.fs.lock();

        let dir = Self::resolve(&fs, path)?;
        if !dir.is_dir() {
            return Err(Error::NotADirectory);
        }

        let content = fs.read_all(&dir);
        let mut entries = Vec::with_capacity(content.len() / DirEntry::SIZE);
        for record in content.chunks_exact(DirEntry::SIZE) {
            let mut entry = DirEntry::default();
            entry.as_bytes_mut().copy_from_slice(record);

            let child = fs.read_inode(entry.id());
            entries.push(vfs::DirEntry {
                inode: entry.id() as u64,
                ty: child.kind.into(),
                size: child.size,
                name: String::from(entry.name()),
            });
        }

        Ok(entries)
    }

    pub fn stat(&self, path: &str) -> Result<Stat, Error> {
        let fs = self.fs.lock();
        let inode = Self::resolve(&fs, path)?;

        Ok(Stat {
            kind: inode.kind.into(),
            block_size: BLOCK_SIZE as u64,
            blocks: inode.used_blocks() as u64,
            size: inode.size,
        })
    }
}

impl Vfs {
    /// 自根目录起逐段下行，定位路径指向的索引节点。
    ///
    /// `"/"` 直接命中根；缺失的段报 [`Error::NotFound`]，
    /// 中间段不是目录则报 [`Error::NotADirectory`]。
    fn resolve(fs: &MiniFileSystem, path: &str) -> Result<DiskInode, Error> {
        if !path.is_absolute() {
            return Err(Error::NotFound);
        }

        let mut inode = fs.root_inode();
        let Some(relat) = path.root_relative() else {
            return Ok(inode);
        };

        for cmp in relat.split('/') {
            if !inode.is_dir() {
                log::error!("middle segment before {cmp:?} isn't directory");
                return Err(Error::NotADirectory);
            }

            let id = Self::lookup(fs, &inode, cmp).ok_or(Error::NotFound)?;
            inode = fs.read_inode(id);
        }

        Ok(inode)
    }

    /// 在目录内容里线性扫描名字，命中则给出子项的索引节点ID
    fn lookup(fs: &MiniFileSystem, dir: &DiskInode, name: &str) -> Option<u32> {
        let content = fs.read_all(dir);

        content.chunks_exact(DirEntry::SIZE).find_map(|record| {
            let mut entry = DirEntry::default();
            entry.as_bytes_mut().copy_from_slice(record);

            (entry.name() == name).then_some(entry.id())
        })
    }
}

impl From<DirEntryType> for DiskInodeKind {
    #[inline]
    fn from(ty: DirEntryType) -> Self {
        match ty {
            DirEntryType::Directory => Self::Directory,
            DirEntryType::Regular => Self::File,
        }
    }
}

impl From<DiskInodeKind> for DirEntryType {
    #[inline]
    fn from(kind: DiskInodeKind) -> Self {
        match kind {
            DiskInodeKind::Directory => Self::Directory,
            DiskInodeKind::File => Self::Regular,
        }
    }
}

impl From<DiskInodeKind> for StatKind {
    #[inline]
    fn from(kind: DiskInodeKind) -> Self {
        match kind {
            DiskInodeKind::Directory => Self::DIR,
            DiskInodeKind::File => Self::FILE,
        }
    }
}
