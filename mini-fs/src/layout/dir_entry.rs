use core::{ptr, slice};

/// 目录项名字的最大字节长度
pub const NAME_MAX_LEN: usize = 11;

/// 目录项：名字到子索引节点ID的定长映射。
///
/// 目录的内容就是一串紧排的目录项记录，
/// 只在尾部追加，不删除也不整理。
#[derive(Debug, Default, Clone)]
#[repr(C)]
pub struct DirEntry {
    // 最后一字节留给 \0
    name: [u8; NAME_MAX_LEN + 1],
    id: u32,
}

impl DirEntry {
    /// 目录项大小恒为16字节
    pub const SIZE: usize = 16;

    /// 调用者保证 `name.len() <= NAME_MAX_LEN`
    #[inline]
    pub fn new(name: &str, id: u32) -> Self {
        let bytes = name.as_bytes();
        let mut name = [0; NAME_MAX_LEN + 1];
        name[..bytes.len()].copy_from_slice(bytes);

        Self { name, id }
    }

    pub fn name(&self) -> &str {
        let len = self.name.iter().position(|&c| c == 0).unwrap();
        core::str::from_utf8(&self.name[..len]).unwrap()
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
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
