use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of where the bytes end up.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What was being read or written.
        message: String,
        /// Transport or filesystem error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Stored content could not be decoded.
    #[error("stored data is corrupt: {message}")]
    Corrupt {
        /// Which blob failed to decode.
        message: String,
        /// Decoder error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// An object key would escape its namespace.
    #[error("invalid object key `{0}`")]
    InvalidKey(String),
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corrupt-data error from a decoding failure.
    pub fn corrupt(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Corrupt {
            message,
            source: Box::new(source),
        }
    }
}
