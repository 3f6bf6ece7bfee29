use alloc::string::String;

/// 列目录时交给调用者的目录项
#[derive(Debug)]
pub struct DirEntry {
    /// Inode number
    pub inode: u64,
    pub ty: DirEntryType,
    /// 项的内容大小（字节）
    pub size: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DirEntryType {
    Directory,
    #[default]
    Regular,
}
