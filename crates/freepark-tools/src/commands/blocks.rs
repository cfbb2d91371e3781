//! List the blocks of a resource file.

use anyhow::{Context, Result};
use clap::Parser;
use freepark_common::StorageConfig;
use freepark_fileio::RcdFileReader;
use freepark_gameplay::scan_blocks;
use std::path::PathBuf;

/// List the blocks of a resource file
#[derive(Parser)]
pub struct Blocks {
    /// Resource file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

impl Blocks {
    pub fn execute(self, config: &StorageConfig) -> Result<()> {
        let path = super::resolve_resource(config, &self.file)?;
        let mut rcd = RcdFileReader::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let blocks = scan_blocks(&mut rcd)?;

        println!("{}: {} block(s)", path.display(), blocks.len());
        println!("{:>5}  {:<4}  {:>7}  {:>9}  {:>9}", "#", "tag", "version", "offset", "size");
        for block in &blocks {
            println!(
                "{:>5}  {:<4}  {:>7}  {:>9}  {:>9}",
                block.number, block.header.tag, block.header.version, block.offset, block.header.size
            );
        }
        Ok(())
    }
}
