//! Error types for FreePark.

use thiserror::Error;

/// The structured error raised when reading or writing game data fails.
///
/// Every decode failure travels upward through this type. The variant tells
/// the category, the rendered message names the field, block or pattern that
/// failed.
#[derive(Debug, Error)]
pub enum LoadingError {
    /// Fewer bytes remain than a field needs.
    #[error("Length mismatch at {what} ({missing} bytes missing)")]
    ShortRead {
        /// Logical name of the field being read.
        what: String,
        /// Number of bytes that were not available.
        missing: usize,
    },

    /// A block's remaining length is below the minimum a field group needs.
    #[error("Length too short for {what} (at least {missing} bytes missing)")]
    TooShort {
        /// Logical name of the field group.
        what: String,
        /// Lower bound of the bytes missing.
        missing: usize,
    },

    /// More bytes remain than the field group declared.
    #[error("Length mismatch at {what} ({trailing} trailing bytes)")]
    TrailingBytes {
        /// Logical name of the field group.
        what: String,
        /// Number of bytes left over.
        trailing: usize,
    },

    /// The stored version is not one this code can decode.
    #[error("{what}: Version mismatch: Found version {found}, supported version is {supported}")]
    VersionMismatch {
        /// Block or pattern name.
        what: String,
        /// Version stored in the data.
        found: u32,
        /// Highest (or only) version understood.
        supported: u32,
    },

    /// A polymorphic type tag has no known variant.
    #[error("Unknown {family} type {value}")]
    UnknownDiscriminant {
        /// Name of the polymorphic family.
        family: &'static str,
        /// The discriminant found.
        value: u8,
    },

    /// Opens and closes did not nest, or a marker did not match.
    #[error("Structure error: {0}")]
    Structure(String),

    /// A decoded value lies outside its documented domain.
    #[error("Invalid data: {0}")]
    Invalid(String),

    /// Free-form message from a domain loader.
    #[error("{0}")]
    Message(String),

    /// The underlying file could not be accessed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for loading and saving operations.
pub type LoadResult<T> = Result<T, LoadingError>;

/// Build a [`LoadingError::Message`] from a format string.
///
/// ```
/// use freepark_common::loading_error;
/// let err = loading_error!("Mission without scenarios");
/// assert_eq!(err.to_string(), "Mission without scenarios");
/// ```
#[macro_export]
macro_rules! loading_error {
    ($($arg:tt)*) => {
        $crate::error::LoadingError::Message(format!($($arg)*))
    };
}

/// Configuration and storage location errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No environment variable or platform lookup yielded a home directory.
    #[error("Unable to locate the user home directory. Set the HOME environment variable to fix the problem.")]
    NoHomeDirectory,

    /// A data file is not present in any search path.
    #[error("Data file {0} is missing, the installation seems to be broken!")]
    DataFileMissing(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
