use std::fmt;

/// Custom error type for tf-signature-extractor
///
/// The decoders never produce these; they come from loading model files and
/// from lookups that require a signature or tensor to exist.
#[derive(Debug)]
pub enum Error {
    /// I/O error when reading files
    Io(std::io::Error),
    /// Model structure error
    InvalidModel(String),
    /// Missing required signature, input or output
    MissingField(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidModel(msg) => write!(f, "Invalid model: {}", msg),
            Error::MissingField(field) => write!(f, "Missing required field: {}", field),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Result type for tf-signature-extractor operations
pub type Result<T> = std::result::Result<T, Error>;
