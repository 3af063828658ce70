//! Error type shared by every fallible operation of the crate
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Raw path can not be rendered as is, e.g. it does not start with a current point
    #[error("malformed path: {reason}")]
    MalformedPath { reason: String },

    /// Glueing onto a path whose last subpath is closed
    #[error("cannot glue to a closed subpath")]
    Glue,

    /// Textual path description is invalid
    #[error("parse error at offset {offset}: {reason}")]
    Parse { reason: String, offset: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(error) => error,
            error => Self::new(std::io::ErrorKind::InvalidData, error),
        }
    }
}
