//! # FreePark File IO
//!
//! Binary readers and writers for FreePark data:
//! - [`reader`]: little-endian primitives over a finite byte source
//! - [`rcd`]: tagged, versioned, length-delimited blocks of resource files
//! - [`loader`] / [`saver`]: nested, versioned patterns of savegames
//!
//! ```
//! use freepark_common::Tag;
//! use freepark_fileio::{Loader, Saver};
//!
//! let mut svr = Saver::new();
//! svr.start_pattern(Tag(*b"OJGU"), 1);
//! svr.put_long(100);
//! svr.end_pattern().unwrap();
//! let bytes = svr.finish().unwrap();
//!
//! let mut ldr = Loader::new(&bytes);
//! assert_eq!(ldr.open_pattern(Tag(*b"OJGU")).unwrap(), 1);
//! assert_eq!(ldr.get_long().unwrap(), 100);
//! ldr.close_pattern().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod loader;
pub mod rcd;
pub mod reader;
pub mod saver;

pub use loader::{Loader, MAX_PATTERN_DEPTH};
pub use rcd::{BlockHeader, RcdFileReader, BLOCK_HEADER_SIZE};
pub use reader::ByteReader;
pub use saver::Saver;
