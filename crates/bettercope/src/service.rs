//! Fan-out over sources: one task per source, results merged as they come.

use crate::bundle::{BUNDLE_FILENAME, create_archive};
use crate::error::ServiceError;
use crate::events::SearchEvent;
use log::{debug, info, warn};
use sources::{DownloadRequest, Scraper, SearchRequest, SearchResponse, Source, SubtitleFile};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Split a comma-separated source list, dropping blank entries.
pub fn split_sources(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Clone, Debug)]
pub struct SubtitleService {
    scraper: Scraper,
}

impl SubtitleService {
    pub fn new(scraper: Scraper) -> Self {
        Self { scraper }
    }

    /// Resolve source names. No names means every source; repeats collapse.
    ///
    /// # Errors
    /// Returns `ServiceError::InvalidSource` for the first unknown name.
    pub fn validate_sources(names: &[String]) -> Result<Vec<Source>, ServiceError> {
        if names.is_empty() {
            return Ok(Source::ALL.to_vec());
        }
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let source = name
                .parse::<Source>()
                .map_err(|_| ServiceError::InvalidSource(name.clone()))?;
            if !resolved.contains(&source) {
                resolved.push(source);
            }
        }
        Ok(resolved)
    }

    fn prepare(request: &SearchRequest) -> Result<(String, Vec<Source>), ServiceError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(ServiceError::EmptyQuery);
        }
        Ok((query.to_owned(), Self::validate_sources(&request.sources)?))
    }

    /// Search every requested source concurrently and collect everything.
    /// A failing source is logged and contributes nothing.
    ///
    /// # Errors
    /// Returns `EmptyQuery` or `InvalidSource` before any request is made.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, ServiceError> {
        let (query, sources) = Self::prepare(&request)?;
        let mut tasks = JoinSet::new();
        for source in sources {
            let scraper = self.scraper.clone();
            let query = query.clone();
            tasks.spawn(async move { (source, scraper.search(source, &query).await) });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(found))) => results.extend(found),
                Ok((source, Err(err))) => warn!("search failed for source {source}: {err}"),
                Err(err) => warn!("search task failed: {err}"),
            }
        }
        info!("{} results for {query:?}", results.len());
        Ok(SearchResponse { results })
    }

    /// Search every requested source concurrently, sending each result as
    /// soon as its source answers.
    ///
    /// Every source ends with a `SourceComplete` event and the stream ends
    /// with `End`. Once `cancel` fires, producers stop and no further
    /// events are promised. Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns `EmptyQuery` or `InvalidSource` before anything is spawned.
    pub fn stream_search(
        &self,
        request: SearchRequest,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<SearchEvent>, ServiceError> {
        let (query, sources) = Self::prepare(&request)?;
        let (tx, rx) = mpsc::channel(self.scraper.config().stream_buffer);

        let mut producers = JoinSet::new();
        for source in sources {
            producers.spawn(produce(
                self.scraper.clone(),
                source,
                query.clone(),
                tx.clone(),
                cancel.clone(),
            ));
        }

        tokio::spawn(async move {
            while producers.join_next().await.is_some() {}
            if cancel.is_cancelled() {
                debug!("stream search cancelled");
                return;
            }
            if tx.send(SearchEvent::End).await.is_err() {
                debug!("stream search receiver dropped before end");
            }
        });
        Ok(rx)
    }

    /// Download one subtitle file.
    ///
    /// # Errors
    /// Returns `InvalidSource` for an unknown source name, or `Download`
    /// wrapping the scraper's failure.
    pub async fn download(&self, request: DownloadRequest) -> Result<SubtitleFile, ServiceError> {
        let source = request
            .source
            .parse::<Source>()
            .map_err(|_| ServiceError::InvalidSource(request.source.clone()))?;
        self.scraper
            .download(source, &request.url)
            .await
            .map_err(|error| ServiceError::Download {
                site: source,
                error,
            })
    }

    /// Download several files concurrently and zip the ones that arrived.
    /// Entries keep the order of `requests`; failures are logged and left out.
    ///
    /// # Errors
    /// Returns `NothingDownloaded` when no file could be fetched, or
    /// `Archive` if zipping fails.
    pub async fn download_bundle(
        &self,
        requests: Vec<DownloadRequest>,
    ) -> Result<SubtitleFile, ServiceError> {
        let mut tasks = JoinSet::new();
        for (index, request) in requests.into_iter().enumerate() {
            let service = self.clone();
            tasks.spawn(async move {
                let url = request.url.clone();
                (index, url, service.download(request).await)
            });
        }

        let mut downloaded = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(file))) => downloaded.push((index, file)),
                Ok((_, url, Err(err))) => warn!("skipping {url} in bundle: {err}"),
                Err(err) => warn!("bundle download task failed: {err}"),
            }
        }
        if downloaded.is_empty() {
            return Err(ServiceError::NothingDownloaded);
        }
        downloaded.sort_by_key(|&(index, _)| index);
        let files: Vec<SubtitleFile> = downloaded.into_iter().map(|(_, file)| file).collect();
        info!("bundling {} files", files.len());
        Ok(SubtitleFile {
            filename: BUNDLE_FILENAME.to_owned(),
            content: create_archive(&files)?,
        })
    }

    /// Probe every source concurrently; the reachable ones in table order.
    pub async fn available_sources(&self) -> Vec<Source> {
        let mut probes = JoinSet::new();
        for source in Source::ALL {
            let scraper = self.scraper.clone();
            probes.spawn(async move { (source, scraper.is_available(source).await) });
        }
        let mut up = HashSet::new();
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((source, true)) => {
                    up.insert(source);
                }
                Ok((source, false)) => debug!("source {source} is unavailable"),
                Err(err) => warn!("availability probe failed: {err}"),
            }
        }
        Source::ALL
            .into_iter()
            .filter(|source| up.contains(source))
            .collect()
    }
}

/// One streaming producer: scrape `source`, forward its results, report
/// completion.
async fn produce(
    scraper: Scraper,
    source: Source,
    query: String,
    tx: mpsc::Sender<SearchEvent>,
    cancel: CancellationToken,
) {
    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        outcome = scraper.search(source, &query) => outcome,
    };
    let results = match outcome {
        Ok(results) => results,
        Err(err) => {
            warn!("search failed for source {source}: {err}");
            Vec::new()
        }
    };

    let mut count = 0;
    for result in results {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            sent = tx.send(SearchEvent::Result(result)) => {
                if sent.is_err() {
                    return;
                }
                count += 1;
            }
        }
    }

    let complete = SearchEvent::SourceComplete { source, count };
    tokio::select! {
        biased;
        () = cancel.cancelled() => {}
        sent = tx.send(complete) => {
            if sent.is_err() {
                debug!("stream search receiver dropped");
            }
        }
    }
}
