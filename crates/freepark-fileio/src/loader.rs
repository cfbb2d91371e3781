//! Savegame pattern loader.
//!
//! A pattern is a named, versioned record:
//!
//! ```text
//! [tag: 4 bytes][version: u32][fields...][tag reversed: 4 bytes]
//! ```
//!
//! Patterns nest. [`Loader::open_pattern`] returns the stored version and the
//! caller picks the field layout matching it; [`Loader::close_pattern`]
//! verifies the end marker once all fields are consumed.

use crate::reader::ByteReader;
use freepark_common::{LoadResult, LoadingError, Tag};
use tracing::trace;

/// Deepest pattern nesting a savegame may use.
pub const MAX_PATTERN_DEPTH: usize = 64;

/// Reads patterns and primitives from a savegame byte stream.
#[derive(Debug)]
pub struct Loader<'a> {
    /// `None` for a default-initialising loader.
    reader: Option<ByteReader<&'a [u8]>>,
    open: Vec<Tag>,
}

impl<'a> Loader<'a> {
    /// Create a loader over savegame bytes.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Some(ByteReader::new(data)),
            open: Vec::new(),
        }
    }

    /// Create a loader without data.
    ///
    /// Every pattern opens with version 0 and consumes nothing, so each record
    /// falls back to its defaults. Reading a primitive is an error.
    #[must_use]
    pub fn default_init() -> Self {
        Self {
            reader: None,
            open: Vec::new(),
        }
    }

    /// Whether this loader only hands out defaults.
    #[must_use]
    pub fn is_default_init(&self) -> bool {
        self.reader.is_none()
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.reader.as_ref().map_or(0, ByteReader::remaining)
    }

    /// Number of patterns currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Open the pattern named `tag` and return its stored version.
    pub fn open_pattern(&mut self, tag: Tag) -> LoadResult<u32> {
        if self.open.len() >= MAX_PATTERN_DEPTH {
            return Err(LoadingError::Structure(format!(
                "pattern {tag} nested deeper than {MAX_PATTERN_DEPTH} levels"
            )));
        }
        let what = format!("start of pattern {tag}");
        let version = match self.reader.as_mut() {
            None => 0,
            Some(reader) => {
                let found = Tag(reader_array(reader, &what)?);
                if found != tag {
                    return Err(LoadingError::Structure(format!(
                        "expected pattern {tag}, found {found}"
                    )));
                }
                reader
                    .get_u32()
                    .map_err(|e| in_context(e, &format!("version of pattern {tag}")))?
            },
        };
        trace!("Open pattern {tag} version {version} (depth {})", self.open.len());
        self.open.push(tag);
        Ok(version)
    }

    /// Close the innermost open pattern, checking its end marker.
    pub fn close_pattern(&mut self) -> LoadResult<()> {
        let tag = self
            .open
            .pop()
            .ok_or_else(|| LoadingError::Structure("closing a pattern that was never opened".to_string()))?;
        if let Some(reader) = self.reader.as_mut() {
            let marker = reader_array(reader, &format!("end of pattern {tag}"))?;
            if marker != tag.reversed() {
                return Err(LoadingError::Structure(format!(
                    "pattern {tag} end marker not found (found {})",
                    Tag(marker)
                )));
            }
        }
        trace!("Close pattern {tag}");
        Ok(())
    }

    /// The fatal error for a version newer than this code understands.
    #[must_use]
    pub fn version_mismatch(&self, found: u32, supported: u32) -> LoadingError {
        let what = self
            .open
            .last()
            .map_or_else(|| "savegame".to_string(), |tag| format!("pattern {tag}"));
        LoadingError::VersionMismatch { what, found, supported }
    }

    /// Fail via [`Self::version_mismatch`] when `found` exceeds `supported`.
    pub fn check_supported(&self, found: u32, supported: u32) -> LoadResult<()> {
        if found > supported {
            return Err(self.version_mismatch(found, supported));
        }
        Ok(())
    }

    /// Verify that every opened pattern was closed.
    pub fn finish(&self) -> LoadResult<()> {
        match self.open.last() {
            None => Ok(()),
            Some(tag) => Err(LoadingError::Structure(format!(
                "{} pattern(s) still open, innermost {tag}",
                self.open.len()
            ))),
        }
    }

    /// Read an 8 bits unsigned number.
    pub fn get_byte(&mut self) -> LoadResult<u8> {
        let what = self.field_name("byte");
        self.data(&what)?.get_u8().map_err(|e| in_context(e, &what))
    }

    /// Read a 16 bits unsigned number.
    pub fn get_word(&mut self) -> LoadResult<u16> {
        let what = self.field_name("word");
        self.data(&what)?.get_u16().map_err(|e| in_context(e, &what))
    }

    /// Read a 32 bits unsigned number.
    pub fn get_long(&mut self) -> LoadResult<u32> {
        let what = self.field_name("long");
        self.data(&what)?.get_u32().map_err(|e| in_context(e, &what))
    }

    /// Read a nul-terminated string.
    pub fn get_text(&mut self) -> LoadResult<String> {
        let what = self.field_name("text");
        self.data(&what)?.get_text()
    }

    fn field_name(&self, kind: &str) -> String {
        match self.open.last() {
            Some(tag) => format!("{kind} in pattern {tag}"),
            None => kind.to_string(),
        }
    }

    fn data(&mut self, what: &str) -> LoadResult<&mut ByteReader<&'a [u8]>> {
        self.reader
            .as_mut()
            .ok_or_else(|| LoadingError::Structure(format!("no data to read {what}")))
    }
}

fn reader_array(reader: &mut ByteReader<&[u8]>, what: &str) -> LoadResult<[u8; 4]> {
    let mut out = [0u8; 4];
    reader.get_blob_into(&mut out, what)?;
    Ok(out)
}

/// Replace the generic field description of a short read.
fn in_context(err: LoadingError, what: &str) -> LoadingError {
    match err {
        LoadingError::ShortRead { missing, .. } => LoadingError::ShortRead {
            what: what.to_string(),
            missing,
        },
        other => other,
    }
}
