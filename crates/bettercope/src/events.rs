use serde::{Deserialize, Serialize};
use sources::{SearchResult, Source};

/// What a streaming search reports, in the order it happens.
///
/// Serialised as `{"event": "...", "data": ...}` with the event names
/// `result`, `source-complete` and `end`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SearchEvent {
    /// One result, sent as soon as its source has been scraped.
    Result(SearchResult),
    /// A source finished; `count` is how many results it sent, 0 on failure.
    SourceComplete { source: Source, count: usize },
    /// Every source finished.
    End,
}

impl SearchEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Result(_) => "result",
            Self::SourceComplete { .. } => "source-complete",
            Self::End => "end",
        }
    }
}
