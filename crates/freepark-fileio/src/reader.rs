//! Little-endian primitive decoding from a finite byte source.
//!
//! [`ByteReader`] keeps a running position over an immutable buffer. Every
//! read advances the position by the bytes it consumed; a read that runs out
//! of data consumes what was left and fails, so the position never passes the
//! end of the buffer and [`ByteReader::remaining`] stays consistent with what
//! was actually read.

use freepark_common::{LoadResult, LoadingError};

/// Cursor over an owned or borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<B> {
    data: B,
    pos: usize,
}

impl<B: AsRef<[u8]>> ByteReader<B> {
    /// Create a reader positioned at the first byte.
    pub fn new(data: B) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position (number of bytes consumed).
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.as_ref().len()
    }

    /// Whether the source holds no bytes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.pos)
    }

    /// Consume exactly `count` bytes.
    ///
    /// On a short source the remaining bytes are consumed and a
    /// [`LoadingError::ShortRead`] naming `what` is returned.
    pub fn take(&mut self, count: usize, what: &str) -> LoadResult<&[u8]> {
        let available = self.remaining();
        if available < count {
            self.pos = self.len();
            return Err(LoadingError::ShortRead {
                what: what.to_string(),
                missing: count - available,
            });
        }
        let start = self.pos;
        self.pos += count;
        Ok(&self.data.as_ref()[start..self.pos])
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> LoadResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    /// Read an 8 bits unsigned number.
    pub fn get_u8(&mut self) -> LoadResult<u8> {
        Ok(self.take_array::<1>("8 bit value")?[0])
    }

    /// Read an 8 bits signed number.
    pub fn get_i8(&mut self) -> LoadResult<i8> {
        Ok(i8::from_le_bytes(self.take_array("8 bit value")?))
    }

    /// Read a 16 bits unsigned number.
    pub fn get_u16(&mut self) -> LoadResult<u16> {
        Ok(u16::from_le_bytes(self.take_array("16 bit value")?))
    }

    /// Read a 16 bits signed number.
    pub fn get_i16(&mut self) -> LoadResult<i16> {
        Ok(i16::from_le_bytes(self.take_array("16 bit value")?))
    }

    /// Read a 32 bits unsigned number.
    pub fn get_u32(&mut self) -> LoadResult<u32> {
        Ok(u32::from_le_bytes(self.take_array("32 bit value")?))
    }

    /// Read a 32 bits signed number.
    pub fn get_i32(&mut self) -> LoadResult<i32> {
        Ok(i32::from_le_bytes(self.take_array("32 bit value")?))
    }

    /// Read a nul-terminated string of unknown length.
    ///
    /// The string ends at the first nul byte or at the end of the source,
    /// whichever comes first. The nul itself is consumed.
    pub fn get_text(&mut self) -> LoadResult<String> {
        let rest = &self.data.as_ref()[self.pos.min(self.len())..];
        let (text, consumed) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (&rest[..nul], nul + 1),
            None => (rest, rest.len()),
        };
        let start = self.pos;
        let text = std::str::from_utf8(text).map(str::to_string);
        self.pos += consumed;
        text.map_err(|e| LoadingError::Invalid(format!("text at offset {start} is not UTF-8: {e}")))
    }

    /// Fill a caller supplied buffer.
    pub fn get_blob_into(&mut self, buf: &mut [u8], what: &str) -> LoadResult<()> {
        buf.copy_from_slice(self.take(buf.len(), what)?);
        Ok(())
    }

    /// Read `length` bytes into a new owned buffer.
    pub fn get_blob(&mut self, length: usize, what: &str) -> LoadResult<Vec<u8>> {
        Ok(self.take(length, what)?.to_vec())
    }

    /// Move forward by `count` bytes, stopping at the end of the source.
    /// Returns the number of bytes actually skipped.
    pub fn skip(&mut self, count: usize) -> usize {
        let skipped = count.min(self.remaining());
        self.pos += skipped;
        skipped
    }

    /// Look at the next `count` bytes without consuming them.
    #[must_use]
    pub fn peek(&self, count: usize) -> Option<&[u8]> {
        self.data.as_ref().get(self.pos..self.pos.checked_add(count)?)
    }
}
