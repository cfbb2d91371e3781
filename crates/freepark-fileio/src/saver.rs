//! Savegame pattern saver, the mirror of [`crate::loader::Loader`].

use freepark_common::{LoadResult, LoadingError, Tag};
use tracing::trace;

/// Writes patterns and primitives into an in-memory savegame.
#[derive(Debug, Default)]
pub struct Saver {
    out: Vec<u8>,
    open: Vec<Tag>,
}

impl Saver {
    /// Create an empty saver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Start a pattern. Always pass the current version of the record.
    pub fn start_pattern(&mut self, tag: Tag, version: u32) {
        trace!("Start pattern {tag} version {version}");
        self.out.extend_from_slice(tag.as_bytes());
        self.put_long(version);
        self.open.push(tag);
    }

    /// End the innermost pattern.
    pub fn end_pattern(&mut self) -> LoadResult<()> {
        let tag = self
            .open
            .pop()
            .ok_or_else(|| LoadingError::Structure("ending a pattern that was never started".to_string()))?;
        self.out.extend_from_slice(&tag.reversed());
        trace!("End pattern {tag}");
        Ok(())
    }

    /// Write an 8 bits unsigned number.
    pub fn put_byte(&mut self, value: u8) {
        self.out.push(value);
    }

    /// Write a 16 bits unsigned number.
    pub fn put_word(&mut self, value: u16) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a 32 bits unsigned number.
    pub fn put_long(&mut self, value: u32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a nul-terminated string.
    ///
    /// Text containing a nul byte cannot be read back and is refused.
    pub fn put_text(&mut self, text: &str) -> LoadResult<()> {
        if let Some(nul) = text.bytes().position(|b| b == 0) {
            return Err(LoadingError::Invalid(format!("text contains a nul byte at offset {nul}")));
        }
        self.out.extend_from_slice(text.as_bytes());
        self.out.push(0);
        Ok(())
    }

    /// Return the encoded bytes, requiring every pattern to be ended.
    pub fn finish(self) -> LoadResult<Vec<u8>> {
        if let Some(tag) = self.open.last() {
            return Err(LoadingError::Structure(format!(
                "{} pattern(s) not ended, innermost {tag}",
                self.open.len()
            )));
        }
        Ok(self.out)
    }
}
