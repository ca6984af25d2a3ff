//! Unified error type.

use std::io;

/// The error type returned by notekit's fallible operations.
///
/// A handler that wants to answer `404` or `422` does so by declaring that
/// status on its receiver. `Error` is for the cases where no sensible response
/// can be produced at all: a wrapped handler that never started its response,
/// a header that cannot be rewritten, or a filesystem failure while indexing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The wrapped handler returned without declaring a status line.
    #[error("response forwarded before the wrapped handler declared a status")]
    InvalidState,

    /// A `Content-Length` value that is not a decimal byte count.
    #[error("invalid content-length `{0}`")]
    InvalidContentLength(String),

    /// A status line that does not start with a three-digit code.
    #[error("invalid status line `{0}`")]
    InvalidStatus(String),

    /// A header name or value the `http` crate refuses to carry.
    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    /// An I/O failure while reading the tree or writing the index.
    #[error("filesystem: {0}")]
    Filesystem(#[from] io::Error),
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        Self::Filesystem(e.into())
    }
}
