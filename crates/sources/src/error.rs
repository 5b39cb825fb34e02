use html::StreamError;
use thiserror::Error;

/// Failure of one operation against one subtitle site.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unknown source: {0}")]
    UnknownSource(String),
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Fetch { url: String, source: StreamError },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read page {url}: {source}")]
    Parse {
        url: String,
        source: html::ParseError,
    },
    #[error("download link not found on {url}")]
    LinkNotFound { url: String },
}
