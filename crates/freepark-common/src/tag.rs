//! Four-character tags naming resource blocks and savegame patterns.

use std::fmt;

/// A four byte name, stored without a terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Size of a tag on disk.
    pub const SIZE: usize = 4;

    /// Creates a tag from its four bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the tag.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The tag bytes in reverse order, used as the end marker of a pattern.
    #[must_use]
    pub const fn reversed(&self) -> [u8; 4] {
        [self.0[3], self.0[2], self.0[1], self.0[0]]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}
