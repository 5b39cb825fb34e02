use sources::{Source, SourceError};
use thiserror::Error;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error("invalid source: {0}")]
    InvalidSource(String),
    #[error("download from {site} failed: {error}")]
    Download {
        site: Source,
        #[source]
        error: SourceError,
    },
    #[error("none of the requested subtitles could be downloaded")]
    NothingDownloaded,
    #[error("failed to build archive: {0}")]
    Archive(#[from] ZipError),
}
