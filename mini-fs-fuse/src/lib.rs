#[cfg(test)]
mod tests;

use std::fs::{File, OpenOptions};
use std::io;
use std::io::{Read, Write};
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use block_dev::BlockDevice;

/// 宿主文件模拟的字节寻址存储设备
pub struct BlockFile {
    file: Mutex<File>,
    capacity: usize,
}

impl BlockFile {
    /// 新建（或截断）镜像文件并预留容量
    pub fn create(path: impl AsRef<Path>, capacity: usize) -> io::Result<Self> {
        let fd = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        fd.set_len(capacity as u64)?;

        Ok(Self {
            file: Mutex::new(fd),
            capacity,
        })
    }

    /// 打开既有镜像，容量取自文件长度
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let fd = OpenOptions::new().read(true).write(true).open(path)?;
        let capacity = fd.metadata()?.len() as usize;

        Ok(Self {
            file: Mutex::new(fd),
            capacity,
        })
    }
}

impl BlockDevice for BlockFile {
    fn read_at(&self, addr: usize, buf: &mut [u8]) {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(addr as u64)).expect("seeking error");
        file.read_exact(buf).expect("not a complete read!");
    }

    fn write_at(&self, addr: usize, buf: &[u8]) {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(addr as u64)).expect("seeking error");
        file.write_all(buf).expect("not a complete write!");
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
