use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    /// Host directory whose regular files get packed
    #[arg(long, short)]
    pub source: PathBuf,

    /// Output directory for fs.img
    #[arg(long, short = 'O')]
    pub out_dir: PathBuf,

    /// Image capacity in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    pub capacity: usize,
}
