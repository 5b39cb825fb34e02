//! HTTP access behind a trait, so adapters can run against canned pages.

use crate::config::ScrapeConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use core::fmt;
use core::pin::Pin;
use html::{Document, ParseError, StreamError};
use log::debug;
use reqwest::redirect::Policy;
use tokio_stream::{Stream, StreamExt as _, once};
use url::Url;

/// Response body as a stream of chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StreamError>> + Send>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Head,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    pub method: Method,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn head(url: Url) -> Self {
        Self::new(Method::Head, url)
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }
}

/// Status, headers and a not yet consumed body.
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ByteStream,
}

impl fmt::Debug for FetchResponse {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FetchResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl FetchResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: ByteStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response whose whole body is already in memory.
    pub fn from_bytes(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        let chunk: Result<Bytes, StreamError> = Ok(body.into());
        Self::new(status, headers, Box::pin(once(chunk)))
    }

    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Read the whole body.
    ///
    /// # Errors
    /// Returns the first error the body stream yields.
    pub async fn bytes(self) -> Result<Bytes, StreamError> {
        let mut body = self.body;
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Parse the body as HTML while it downloads.
    ///
    /// # Errors
    /// Returns a `ParseError` if the body stream fails.
    pub async fn into_document(self) -> Result<Document, ParseError> {
        Document::from_stream(self.body).await
    }
}

/// Something that can perform an HTTP exchange.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Send `request` and return the response without reading its body.
    /// Non-success statuses are not errors at this level.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, SourceError>;
}

/// [`Fetcher`] over a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and User-Agent, following
    /// at most ten redirects.
    ///
    /// # Errors
    /// Returns `SourceError::Client` if the TLS backend cannot be set up.
    pub fn new(config: &ScrapeConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .redirect(Policy::limited(10))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, SourceError> {
        let FetchRequest {
            url,
            method,
            headers,
        } = request;
        debug!("{method:?} {url}");
        let mut builder = match method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
            Method::Head => self.client.head(url.clone()),
        };
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let response = builder.send().await.map_err(|err| SourceError::Fetch {
            url: url.to_string(),
            source: err.into(),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(StreamError::from));
        Ok(FetchResponse::new(status, headers, Box::pin(body)))
    }
}
