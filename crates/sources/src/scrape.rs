//! The scrape routine shared by every source: build the search URL, pick
//! results out of the listing page, follow a post to its download link.

use crate::config::ScrapeConfig;
use crate::error::SourceError;
use crate::fetch::{FetchRequest, FetchResponse, Fetcher, HttpFetcher};
use crate::filename::derive_filename;
use crate::models::{SearchResult, SubtitleFile};
use crate::site::{SiteConfig, Source};
use core::fmt;
use html::Document;
use log::{debug, info};
use std::sync::Arc;
use tokio::time::timeout;
use url::{Url, form_urlencoded};

fn parse_url(raw: &str) -> Result<Url, SourceError> {
    Url::parse(raw).map_err(|err| SourceError::InvalidUrl {
        url: raw.to_owned(),
        source: err,
    })
}

/// `{base}/?s={query}`, with the query form-encoded.
///
/// # Errors
/// Returns `SourceError::InvalidUrl` if the result is not a valid URL.
pub fn search_url(source: Source, query: &str) -> Result<Url, SourceError> {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    parse_url(&format!("{}/?s={encoded}", source.site().base_url))
}

fn is_ignored(site: &SiteConfig, title: &str, url: &str) -> bool {
    site.ignore_patterns
        .iter()
        .any(|pattern| title.contains(pattern) || url.contains(pattern))
}

/// Results listed on a search page, in page order. Items without a link or
/// with a blank title are skipped, as are ignored ones.
pub fn parse_search_results(source: Source, document: &Document) -> Vec<SearchResult> {
    let site = source.site();
    document
        .find(site.result_selector)
        .iter()
        .filter_map(|item| {
            let link = site
                .link_selector
                .map_or(item, |selector| item.find(selector).first());
            let url = link.attr("href")?;
            let heading = site
                .title_selector
                .map_or(item, |selector| item.find(selector).first());
            let title = heading.text().trim().to_owned();
            if title.is_empty() || is_ignored(site, &title, url) {
                return None;
            }
            Some(SearchResult {
                title,
                url: url.to_owned(),
                source,
            })
        })
        .collect()
}

/// Download URL advertised on a post page, if any.
pub fn download_link(source: Source, document: &Document) -> Option<String> {
    let site = source.site();
    document
        .find(site.download_selector)
        .first()
        .attr(site.download_attr)
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_owned)
}

/// Runs the per-site operations over a shared [`Fetcher`]. Cheap to clone.
#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn Fetcher>,
    config: ScrapeConfig,
}

impl fmt::Debug for Scraper {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Scraper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Scraper {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: ScrapeConfig) -> Self {
        Self { fetcher, config }
    }

    /// Scraper over a real HTTP client.
    ///
    /// # Errors
    /// Returns `SourceError::Client` if the client cannot be built.
    pub fn from_config(config: ScrapeConfig) -> Result<Self, SourceError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    pub const fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    async fn fetch_ok(&self, request: FetchRequest) -> Result<FetchResponse, SourceError> {
        let url = request.url.to_string();
        let response = self.fetcher.fetch(request).await?;
        if !response.is_ok() {
            return Err(SourceError::Status {
                url,
                status: response.status,
            });
        }
        Ok(response)
    }

    async fn fetch_document(&self, url: Url) -> Result<Document, SourceError> {
        let page = url.to_string();
        let response = self.fetch_ok(FetchRequest::get(url)).await?;
        response
            .into_document()
            .await
            .map_err(|err| SourceError::Parse {
                url: page,
                source: err,
            })
    }

    /// Search one site.
    ///
    /// # Errors
    /// Fails if the listing page cannot be fetched or does not answer 200.
    pub async fn search(&self, source: Source, query: &str) -> Result<Vec<SearchResult>, SourceError> {
        let url = search_url(source, query)?;
        debug!("{source}: searching {url}");
        let document = self.fetch_document(url).await?;
        let results = parse_search_results(source, &document);
        info!("{source}: {} results for {query:?}", results.len());
        Ok(results)
    }

    /// Fetch the post page, follow its download link and read the file.
    ///
    /// # Errors
    /// Fails on any non-200 answer, on a post page without a download link,
    /// or if the file body cannot be read.
    pub async fn download(&self, source: Source, post_url: &str) -> Result<SubtitleFile, SourceError> {
        let site = source.site();
        let post = parse_url(post_url)?;
        let document = self.fetch_document(post.clone()).await?;
        let link = download_link(source, &document).ok_or_else(|| SourceError::LinkNotFound {
            url: post_url.to_owned(),
        })?;
        // Relative links resolve against the post page.
        let download_url = post.join(&link).map_err(|err| SourceError::InvalidUrl {
            url: link.clone(),
            source: err,
        })?;
        debug!("{source}: downloading {download_url}");

        let mut request = FetchRequest::new(site.download_method, download_url.clone())
            .with_header("User-Agent", &self.config.user_agent);
        for &(name, value) in site.download_headers {
            request = request.with_header(name, value);
        }
        let response = self.fetch_ok(request).await?;
        let filename = derive_filename(source, &response, &download_url);
        let content = response.bytes().await.map_err(|err| SourceError::Fetch {
            url: download_url.to_string(),
            source: err,
        })?;
        info!("{source}: downloaded {filename} ({} bytes)", content.len());
        Ok(SubtitleFile {
            filename,
            content: content.to_vec(),
        })
    }

    /// HEAD the site's base URL; true only for a 200 within the probe timeout.
    pub async fn is_available(&self, source: Source) -> bool {
        let Ok(url) = parse_url(source.site().base_url) else {
            return false;
        };
        match timeout(self.config.probe_timeout(), self.fetcher.fetch(FetchRequest::head(url))).await {
            Ok(Ok(response)) => response.is_ok(),
            Ok(Err(err)) => {
                debug!("{source}: probe failed: {err}");
                false
            }
            Err(_) => {
                debug!("{source}: probe timed out");
                false
            }
        }
    }
}
