mod cli;

use std::fs;
use std::io;
use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use mini_fs::Vfs;
use mini_fs_fuse::BlockFile;
use vfs::DirEntryType;

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    println!("source={:?}\nout_dir={:?}", cli.source, cli.out_dir);

    let block_file = Arc::new(BlockFile::create(cli.out_dir.join("fs.img"), cli.capacity)?);
    // 新镜像没有合法文件头，打开即格式化
    let mfs = Vfs::new(block_file);

    for entry in fs::read_dir(&cli.source)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_str().expect("file name isn't valid UTF-8");
        let data = fs::read(entry.path())?;

        let path = format!("/{name}");
        if let Err(e) = mfs
            .create(&path, DirEntryType::Regular)
            .and_then(|_| mfs.set_content(&path, &data))
        {
            log::warn!("skipping {name}: {e:?}");
            continue;
        }
        println!("packed: {name} ({} bytes)", data.len());
    }

    for entry in mfs.read_dir("/").expect("root must be listable") {
        println!("{entry:?}");
    }

    Ok(())
}
