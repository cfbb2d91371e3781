//! Named strings from `TEXT` blocks of resource files.

use freepark_common::{LoadResult, LoadingError, Tag};
use freepark_fileio::{ByteReader, RcdFileReader};
use std::collections::BTreeMap;

/// Text block.
pub const TAG_TEXT: Tag = Tag(*b"TEXT");
/// Supported version of the TEXT block.
pub const CURRENT_VERSION_TEXT: u32 = 1;

/// Texts of a resource file, by block number.
pub type TextMap = BTreeMap<u32, TextData>;

/// The strings of one text block, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextData {
    strings: Vec<(String, String)>,
}

impl TextData {
    /// Creates text data from `(name, text)` pairs.
    #[must_use]
    pub fn new(strings: Vec<(String, String)>) -> Self {
        Self { strings }
    }

    /// Text of the string called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.strings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }

    /// Number of strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the block holds no strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// All `(name, text)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }
}

/// Load the current `TEXT` block.
pub fn load_text_block(rcd: &mut RcdFileReader) -> LoadResult<TextData> {
    rcd.check_version(CURRENT_VERSION_TEXT)?;
    let size = rcd.block().map_or(0, |b| b.size);
    rcd.check_min_length(size, 4, "text count")?;
    let payload = rcd.get_blob(size, "TEXT block")?;
    parse_text_payload(&payload).map_err(|e| rcd.error(e))
}

fn parse_text_payload(payload: &[u8]) -> LoadResult<TextData> {
    let mut reader = ByteReader::new(payload);
    let count = reader.get_u32()?;
    let mut strings = Vec::new();
    for i in 0..count {
        let name = read_terminated(&mut reader, i, "name")?;
        let text = read_terminated(&mut reader, i, "text")?;
        strings.push((name, text));
    }
    if reader.remaining() > 0 {
        return Err(LoadingError::TrailingBytes {
            what: "end of TEXT block".to_string(),
            trailing: reader.remaining(),
        });
    }
    Ok(TextData { strings })
}

fn read_terminated(reader: &mut ByteReader<&[u8]>, index: u32, part: &str) -> LoadResult<String> {
    if reader.remaining() == 0 {
        return Err(LoadingError::ShortRead {
            what: format!("{part} of string {index} in TEXT block"),
            missing: 1,
        });
    }
    reader.get_text()
}
