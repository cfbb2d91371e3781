//! Loading of RCD resource files.

use crate::mission::{load_mission, Mission, TAG_MISN};
use crate::text::{load_text_block, TextMap, TAG_TEXT};
use freepark_common::{LoadResult, Tag};
use freepark_fileio::{BlockHeader, RcdFileReader};
use std::path::Path;
use tracing::{debug, info};

/// Resource file header.
pub const TAG_RCDF: Tag = Tag(*b"RCDF");
/// Supported version of the resource file header.
pub const CURRENT_VERSION_RCDF: u32 = 2;

/// A block found while scanning a resource file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEntry {
    /// Position of the block in the file, starting at 1.
    pub number: u32,
    /// Offset of the block payload in the file.
    pub offset: usize,
    /// Header of the block.
    pub header: BlockHeader,
}

/// Everything loaded from resource files.
#[derive(Debug, Default)]
pub struct ResourceStore {
    /// Texts of the most recently loaded file, by block number.
    pub texts: TextMap,
    /// Missions of all loaded files, in load order.
    pub missions: Vec<Mission>,
}

impl ResourceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a resource file from disk.
    pub fn load_file(&mut self, path: &Path) -> LoadResult<()> {
        let mut rcd = RcdFileReader::open(path)?;
        self.load(&mut rcd)
    }

    /// Load a resource file held in memory.
    pub fn load_bytes(&mut self, name: &str, bytes: Vec<u8>) -> LoadResult<()> {
        let mut rcd = RcdFileReader::from_bytes(name, bytes);
        self.load(&mut rcd)
    }

    /// Read the whole file first; the store only changes when every block loaded.
    fn load(&mut self, rcd: &mut RcdFileReader) -> LoadResult<()> {
        check_header(rcd)?;
        // Block numbers are local to a file.
        let mut texts = TextMap::new();
        let mut missions = Vec::new();

        let mut number = 1;
        while rcd.remaining() > 0 {
            let header = next_block(rcd, number)?;
            match header.tag {
                TAG_TEXT => {
                    let text = load_text_block(rcd)?;
                    texts.insert(number, text);
                },
                TAG_MISN => {
                    let mission = load_mission(rcd, &texts)?;
                    missions.push(mission);
                },
                _ => {
                    debug!("Skipping unknown block {} (number {number}) in {}", header.tag, rcd.filename());
                    if !rcd.skip_bytes(header.size) {
                        return Err(rcd.error(format!("Block {} could not be skipped", header.tag)));
                    }
                },
            }
            number += 1;
        }

        info!(
            "Loaded {} text block(s) and {} mission(s) from {}",
            texts.len(),
            missions.len(),
            rcd.filename()
        );
        self.texts = texts;
        self.missions.append(&mut missions);
        Ok(())
    }
}

/// List the blocks of a resource file without interpreting them.
pub fn scan_blocks(rcd: &mut RcdFileReader) -> LoadResult<Vec<BlockEntry>> {
    check_header(rcd)?;
    let mut blocks = Vec::new();
    let mut number = 1;
    while rcd.remaining() > 0 {
        let header = next_block(rcd, number)?;
        blocks.push(BlockEntry {
            number,
            offset: rcd.position(),
            header,
        });
        rcd.skip_bytes(header.size);
        number += 1;
    }
    Ok(blocks)
}

fn check_header(rcd: &mut RcdFileReader) -> LoadResult<()> {
    if !rcd.check_file_header(TAG_RCDF, CURRENT_VERSION_RCDF) {
        return Err(rcd.error(format!("not a {TAG_RCDF} version {CURRENT_VERSION_RCDF} file")));
    }
    Ok(())
}

fn next_block(rcd: &mut RcdFileReader, number: u32) -> LoadResult<BlockHeader> {
    match (rcd.read_block_header(), rcd.block().copied()) {
        (true, Some(header)) => Ok(header),
        _ => Err(rcd.error(format!("Bad header of block {number}"))),
    }
}
