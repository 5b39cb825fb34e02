#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Subtitle site adapters.
//!
//! Every site is a row in a static table ([`SiteConfig`]) of selectors, a
//! base URL and ignore patterns; one generic routine ([`Scraper`]) runs
//! search, download and availability checks for any row. Network access
//! goes through the [`Fetcher`] trait.

mod config;
mod error;
mod fetch;
pub mod filename;
mod models;
mod scrape;
mod site;

pub use config::{DEFAULT_USER_AGENT, ScrapeConfig};
pub use error::SourceError;
pub use fetch::{ByteStream, FetchRequest, FetchResponse, Fetcher, HttpFetcher, Method};
pub use models::{DownloadRequest, SearchRequest, SearchResponse, SearchResult, SubtitleFile};
pub use scrape::{Scraper, download_link, parse_search_results, search_url};
pub use site::{SiteConfig, Source};
