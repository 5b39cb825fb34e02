use core::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Boxed error coming out of a byte stream.
pub type StreamError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure to build a document. Malformed markup is not an error (html5ever
/// recovers from it); only an unreadable input is.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] io::Error),
    #[error("HTML byte stream failed: {0}")]
    Stream(StreamError),
    #[error("HTML parser worker stopped: {0}")]
    Worker(String),
}
