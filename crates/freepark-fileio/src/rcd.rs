//! Reader for RCD resource files.
//!
//! A resource file is a file header followed by a sequence of blocks. Each
//! block starts with a 4 byte tag, a 32 bit version and a 32 bit payload
//! size, letting a reader skip blocks it does not understand.

use crate::reader::ByteReader;
use freepark_common::{LoadResult, LoadingError, Tag};
use std::fs;
use std::path::Path;
use tracing::trace;

/// Size of a block header on disk.
pub const BLOCK_HEADER_SIZE: usize = 12;

/// Header of the block currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block name.
    pub tag: Tag,
    /// Version of the block layout.
    pub version: u32,
    /// Declared payload size in bytes.
    pub size: u32,
}

/// RCD file reader, holding the whole file in memory.
#[derive(Debug)]
pub struct RcdFileReader {
    filename: String,
    reader: ByteReader<Vec<u8>>,
    block: Option<BlockHeader>,
}

impl RcdFileReader {
    /// Open a file and load its contents.
    pub fn open<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Ok(Self::from_bytes(path.display().to_string(), data))
    }

    /// Create a reader over bytes already in memory.
    pub fn from_bytes(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            reader: ByteReader::new(data),
            block: None,
        }
    }

    /// Name of the file, used in error messages.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Header of the last block read by [`Self::read_block_header`].
    #[must_use]
    pub fn block(&self) -> Option<&BlockHeader> {
        self.block.as_ref()
    }

    /// Get length of data not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Current read offset in the file.
    #[must_use]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Check whether the file header names `tag` and stores `version`.
    ///
    /// Any mismatch or short read gives `false`.
    pub fn check_file_header(&mut self, tag: Tag, version: u32) -> bool {
        if self.remaining() < 8 {
            return false;
        }
        let mut name = [0u8; 4];
        if self.reader.get_blob_into(&mut name, "file header").is_err() || Tag(name) != tag {
            return false;
        }
        matches!(self.reader.get_u32(), Ok(v) if v == version)
    }

    /// Starting at the first byte of a block, read the block information.
    ///
    /// Returns whether a complete header was found whose payload fits in the
    /// file. On success the header is available through [`Self::block`].
    pub fn read_block_header(&mut self) -> bool {
        self.block = None;
        if self.remaining() < BLOCK_HEADER_SIZE {
            return false;
        }
        let Ok(header) = self.parse_block_header() else {
            return false;
        };
        trace!(
            "Block {} version {} size {} at offset {}",
            header.tag,
            header.version,
            header.size,
            self.position()
        );
        if header.size as usize > self.remaining() {
            return false;
        }
        self.block = Some(header);
        true
    }

    /// Skip a number of bytes in the file, stopping at its end.
    /// Returns whether all `count` bytes could be skipped.
    pub fn skip_bytes(&mut self, count: u32) -> bool {
        self.reader.skip(count as usize) == count as usize
    }

    /// Check that the current block has exactly the version this code supports.
    pub fn check_version(&self, current_version: u32) -> LoadResult<()> {
        let block = self.current()?;
        if block.version != current_version {
            return Err(LoadingError::VersionMismatch {
                what: format!("{} block {}", self.filename, block.tag),
                found: block.version,
                supported: current_version,
            });
        }
        Ok(())
    }

    /// Check that `length` remaining bytes cover at least `required`.
    pub fn check_min_length(&self, length: u32, required: u32, what: &str) -> LoadResult<()> {
        if length < required {
            return Err(LoadingError::TooShort {
                what: what.to_string(),
                missing: (required - length) as usize,
            });
        }
        Ok(())
    }

    /// Check that `length` remaining bytes are exactly `required`.
    pub fn check_exact_length(&self, length: u32, required: u32, what: &str) -> LoadResult<()> {
        if length < required {
            return Err(LoadingError::ShortRead {
                what: what.to_string(),
                missing: (required - length) as usize,
            });
        }
        if length > required {
            return Err(LoadingError::TrailingBytes {
                what: what.to_string(),
                trailing: (length - required) as usize,
            });
        }
        Ok(())
    }

    /// A loading error carrying the file name.
    #[must_use]
    pub fn error(&self, message: impl std::fmt::Display) -> LoadingError {
        LoadingError::Message(format!("{}: {message}", self.filename))
    }

    /// Read an 8 bits unsigned number.
    pub fn get_u8(&mut self) -> LoadResult<u8> {
        self.reader.get_u8()
    }

    /// Read an 8 bits signed number.
    pub fn get_i8(&mut self) -> LoadResult<i8> {
        self.reader.get_i8()
    }

    /// Read a 16 bits unsigned number.
    pub fn get_u16(&mut self) -> LoadResult<u16> {
        self.reader.get_u16()
    }

    /// Read a 16 bits signed number.
    pub fn get_i16(&mut self) -> LoadResult<i16> {
        self.reader.get_i16()
    }

    /// Read a 32 bits unsigned number.
    pub fn get_u32(&mut self) -> LoadResult<u32> {
        self.reader.get_u32()
    }

    /// Read a 32 bits signed number.
    pub fn get_i32(&mut self) -> LoadResult<i32> {
        self.reader.get_i32()
    }

    /// Read a nul-terminated string.
    pub fn get_text(&mut self) -> LoadResult<String> {
        self.reader.get_text()
    }

    /// Read an embedded blob into an owned buffer of exactly `length` bytes.
    ///
    /// A nested parser handed the result cannot see past the blob.
    pub fn get_blob(&mut self, length: u32, what: &str) -> LoadResult<Vec<u8>> {
        self.reader.get_blob(length as usize, what)
    }

    fn parse_block_header(&mut self) -> LoadResult<BlockHeader> {
        let mut name = [0u8; 4];
        self.reader.get_blob_into(&mut name, "block header")?;
        let version = self.reader.get_u32()?;
        let size = self.reader.get_u32()?;
        Ok(BlockHeader { tag: Tag(name), version, size })
    }

    fn current(&self) -> LoadResult<&BlockHeader> {
        self.block
            .as_ref()
            .ok_or_else(|| LoadingError::Structure("not inside a block".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn block(tag: &[u8; 4], version: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = tag.to_vec();
        out.extend_from_slice(&version.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn file(blocks: &[Vec<u8>]) -> Vec<u8> {
        let mut out = b"RCDF".to_vec();
        out.extend_from_slice(&2u32.to_le_bytes());
        for b in blocks {
            out.extend_from_slice(b);
        }
        out
    }

    #[test]
    fn test_check_file_header() {
        let data = file(&[]);
        let mut rcd = RcdFileReader::from_bytes("test.rcd", data.clone());
        assert!(rcd.check_file_header(Tag(*b"RCDF"), 2));

        let mut rcd = RcdFileReader::from_bytes("test.rcd", data.clone());
        assert!(!rcd.check_file_header(Tag(*b"RCDF"), 3));

        let mut rcd = RcdFileReader::from_bytes("test.rcd", data.clone());
        assert!(!rcd.check_file_header(Tag(*b"FCTS"), 2));

        let mut rcd = RcdFileReader::from_bytes("test.rcd", data[..6].to_vec());
        assert!(!rcd.check_file_header(Tag(*b"RCDF"), 2));
    }

    #[test]
    fn test_read_and_skip_blocks() {
        let data = file(&[block(b"TEXT", 1, &[1, 2, 3]), block(b"MISN", 1, &[9; 5])]);
        let mut rcd = RcdFileReader::from_bytes("test.rcd", data);
        assert!(rcd.check_file_header(Tag(*b"RCDF"), 2));

        assert!(rcd.read_block_header());
        let header = *rcd.block().expect("block");
        assert_eq!(header, BlockHeader { tag: Tag(*b"TEXT"), version: 1, size: 3 });
        assert!(rcd.skip_bytes(header.size));

        assert!(rcd.read_block_header());
        assert_eq!(rcd.block().expect("block").tag, Tag(*b"MISN"));
        assert_eq!(rcd.remaining(), 5);
        assert!(rcd.skip_bytes(5));

        assert!(!rcd.read_block_header());
        assert!(rcd.block().is_none());
    }

    #[test]
    fn test_block_overrunning_file_is_rejected() {
        let mut data = file(&[block(b"TEXT", 1, &[0; 8])]);
        data.truncate(data.len() - 1);
        let mut rcd = RcdFileReader::from_bytes("test.rcd", data);
        assert!(rcd.check_file_header(Tag(*b"RCDF"), 2));
        assert!(!rcd.read_block_header());
        assert!(rcd.block().is_none());
        assert!(matches!(rcd.check_version(1), Err(LoadingError::Structure(_))));
        // Nothing of the payload was consumed.
        assert_eq!(rcd.remaining(), 7);
    }

    #[test]
    fn test_skip_clamps_to_end() {
        let mut rcd = RcdFileReader::from_bytes("test.rcd", vec![0; 4]);
        assert!(!rcd.skip_bytes(10));
        assert_eq!(rcd.remaining(), 0);
    }

    #[test]
    fn test_check_version() {
        let mut rcd = RcdFileReader::from_bytes("test.rcd", block(b"MISN", 2, &[]));
        assert!(matches!(rcd.check_version(1), Err(LoadingError::Structure(_))));
        assert!(rcd.read_block_header());
        let err = rcd.check_version(1).expect_err("mismatch");
        assert_eq!(
            err.to_string(),
            "test.rcd block MISN: Version mismatch: Found version 2, supported version is 1"
        );
        assert!(rcd.check_version(2).is_ok());
    }

    #[test]
    fn test_length_checks() {
        let rcd = RcdFileReader::from_bytes("test.rcd", Vec::new());
        assert!(rcd.check_min_length(12, 12, "header").is_ok());
        assert_eq!(
            rcd.check_min_length(4, 12, "header").expect_err("short").to_string(),
            "Length too short for header (at least 8 bytes missing)"
        );
        assert!(rcd.check_exact_length(0, 0, "end of block").is_ok());
        assert_eq!(
            rcd.check_exact_length(3, 0, "end of block").expect_err("trailing").to_string(),
            "Length mismatch at end of block (3 trailing bytes)"
        );
        assert_eq!(
            rcd.check_exact_length(1, 4, "end of block").expect_err("missing").to_string(),
            "Length mismatch at end of block (3 bytes missing)"
        );
    }

    #[test]
    fn test_open_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("data.rcd");
        fs::write(&path, file(&[block(b"TEXT", 1, b"hi\0")])).expect("write");

        let mut rcd = RcdFileReader::open(&path).expect("open");
        assert!(rcd.check_file_header(Tag(*b"RCDF"), 2));
        assert!(rcd.read_block_header());
        assert_eq!(rcd.get_text().expect("text"), "hi");

        assert!(matches!(
            RcdFileReader::open(temp_dir.path().join("missing.rcd")),
            Err(LoadingError::Io(_))
        ));
    }
}
