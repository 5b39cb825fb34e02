use async_trait::async_trait;
use html::Document;
use sources::{
    FetchRequest, FetchResponse, Fetcher, Method, ScrapeConfig, Scraper, SearchResult, Source,
    SourceError, download_link, parse_search_results, search_url,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves canned responses keyed by method and URL; anything else fails
/// like a refused connection.
#[derive(Default)]
struct CannedFetcher {
    pages: HashMap<(Method, String), (u16, Vec<(String, String)>, String)>,
    seen: Mutex<Vec<FetchRequest>>,
}

impl CannedFetcher {
    fn page(mut self, method: Method, url: &str, status: u16, body: &str) -> Self {
        self.pages
            .insert((method, url.to_owned()), (status, Vec::new(), body.to_owned()));
        self
    }

    fn file(mut self, method: Method, url: &str, headers: &[(&str, &str)], body: &str) -> Self {
        let headers = headers
            .iter()
            .map(|&(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        self.pages
            .insert((method, url.to_owned()), (200, headers, body.to_owned()));
        self
    }
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, SourceError> {
        self.seen.lock().unwrap().push(request.clone());
        match self.pages.get(&(request.method, request.url.to_string())) {
            Some((status, headers, body)) => {
                Ok(FetchResponse::from_bytes(*status, headers.clone(), body.clone()))
            }
            None => Err(SourceError::Fetch {
                url: request.url.to_string(),
                source: "connection refused".into(),
            }),
        }
    }
}

fn scraper(fetcher: CannedFetcher) -> (Scraper, Arc<CannedFetcher>) {
    let fetcher = Arc::new(fetcher);
    let scraper = Scraper::new(Arc::clone(&fetcher) as Arc<dyn Fetcher>, ScrapeConfig::default());
    (scraper, fetcher)
}

const BAISCOPE_LISTING: &str = r#"
<html><body>
  <article class="elementor-post">
    <a class="elementor-post__thumbnail__link" href="https://www.baiscope.lk/movie-one/"><img src="1.jpg"></a>
    <h5 class="elementor-post__title"><a href="https://www.baiscope.lk/movie-one/"> Movie One </a></h5>
  </article>
  <article class="elementor-post">
    <h5 class="elementor-post__title"><a href="https://www.baiscope.lk/movie-two/">Movie Two</a></h5>
  </article>
  <article class="elementor-post">
    <h5 class="elementor-post__title"><a href="https://www.baiscope.lk/trilogy/">Trilogy Collection</a></h5>
  </article>
  <article class="elementor-post">
    <h5 class="elementor-post__title"><a href="https://www.baiscope.lk/blank/">   </a></h5>
  </article>
  <article class="elementor-post"><h5 class="elementor-post__title">No link</h5></article>
</body></html>
"#;

const CINERU_LISTING: &str = r#"
<div class="item-list">
  <div class="post-box-title"><a href="https://cineru.lk/movie-a/">Movie A</a></div>
  <div class="post-box-title"><a href="https://cineru.lk/tv_series/show-b/">Show B</a></div>
  <div class="post-box-title"><a>Missing href</a></div>
</div>
"#;

#[test]
fn source_names_round_trip() {
    for source in Source::ALL {
        assert_eq!(source.name().parse::<Source>().unwrap(), source);
        assert_eq!(source.to_string(), source.name());
    }
    assert!(matches!(
        "opensubtitles".parse::<Source>(),
        Err(SourceError::UnknownSource(name)) if name == "opensubtitles"
    ));
    assert_eq!(serde_json::to_string(&Source::Zoomlk).unwrap(), "\"zoomlk\"");
    assert_eq!(serde_json::from_str::<Source>("\"cineru\"").unwrap(), Source::Cineru);
}

#[test]
fn search_url_form_encodes_the_query() {
    let url = search_url(Source::Cineru, "spider man & co").unwrap();
    assert_eq!(url.as_str(), "https://cineru.lk/?s=spider+man+%26+co");
    let url = search_url(Source::Baiscopelk, "avatar").unwrap();
    assert_eq!(url.as_str(), "https://www.baiscope.lk/?s=avatar");
}

#[test]
fn baiscope_listing_takes_first_link_and_trimmed_title() {
    init();
    let doc = Document::parse_str(BAISCOPE_LISTING);
    let results = parse_search_results(Source::Baiscopelk, &doc);
    assert_eq!(
        results,
        vec![
            SearchResult {
                title: String::from("Movie One"),
                url: String::from("https://www.baiscope.lk/movie-one/"),
                source: Source::Baiscopelk,
            },
            SearchResult {
                title: String::from("Movie Two"),
                url: String::from("https://www.baiscope.lk/movie-two/"),
                source: Source::Baiscopelk,
            },
        ]
    );
}

#[test]
fn cineru_listing_ignores_series_and_missing_links() {
    init();
    let doc = Document::parse_str(CINERU_LISTING);
    let results = parse_search_results(Source::Cineru, &doc);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Movie A");

    // Piratelk shares the markup but not the series filter.
    let results = parse_search_results(Source::Piratelk, &doc);
    let titles: Vec<&str> = results.iter().map(|result| result.title.as_str()).collect();
    assert_eq!(titles, vec!["Movie A", "Show B"]);
    assert!(results.iter().all(|result| result.source == Source::Piratelk));
}

#[test]
fn download_links_per_site() {
    init();
    let doc = Document::parse_str(
        r#"<div id="btn-download" data-link="https://cineru.lk/files/a.zip">Download</div>
           <a data-e-disable-page-transition="true" href="https://www.baiscope.lk/dl/123/">Download</a>
           <a class="download-button" href="https://zoom.lk/dl/a.zip">Download</a>"#,
    );
    assert_eq!(
        download_link(Source::Cineru, &doc).as_deref(),
        Some("https://cineru.lk/files/a.zip")
    );
    assert_eq!(
        download_link(Source::Baiscopelk, &doc).as_deref(),
        Some("https://www.baiscope.lk/dl/123/")
    );
    assert_eq!(
        download_link(Source::Zoomlk, &doc).as_deref(),
        Some("https://zoom.lk/dl/a.zip")
    );
    assert_eq!(download_link(Source::Cineru, &Document::parse_str("<p>nothing</p>")), None);
}

#[tokio::test]
async fn search_fetches_and_parses_the_listing() {
    init();
    let (scraper, fetcher) = scraper(CannedFetcher::default().page(
        Method::Get,
        "https://cineru.lk/?s=movie",
        200,
        CINERU_LISTING,
    ));
    let results = scraper.search(Source::Cineru, "movie").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "https://cineru.lk/movie-a/");
    assert_eq!(fetcher.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn search_rejects_non_200_listing() {
    init();
    let (scraper, _) = scraper(CannedFetcher::default().page(
        Method::Get,
        "https://zoom.lk/?s=movie",
        503,
        "busy",
    ));
    let err = scraper.search(Source::Zoomlk, "movie").await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 503, .. }));
}

#[tokio::test]
async fn cineru_download_follows_data_link() {
    init();
    let (scraper, fetcher) = scraper(
        CannedFetcher::default()
            .page(
                Method::Get,
                "https://cineru.lk/movie-a/",
                200,
                r#"<a id="btn-download" data-link="/files/Movie%20A%20(2024).zip">Download</a>"#,
            )
            .file(
                Method::Get,
                "https://cineru.lk/files/Movie%20A%20(2024).zip",
                &[],
                "PK-bytes",
            ),
    );
    let file = scraper
        .download(Source::Cineru, "https://cineru.lk/movie-a/")
        .await
        .unwrap();
    assert_eq!(file.filename, "Movie A (2024).zip");
    assert_eq!(file.content, b"PK-bytes");

    let seen = fetcher.seen.lock().unwrap();
    let download = &seen[1];
    assert_eq!(download.method, Method::Get);
    assert!(
        download
            .headers
            .iter()
            .any(|(name, value)| name == "User-Agent" && value == sources::DEFAULT_USER_AGENT)
    );
}

#[tokio::test]
async fn baiscope_download_posts_a_form_and_reads_its_header() {
    init();
    let (scraper, fetcher) = scraper(
        CannedFetcher::default()
            .page(
                Method::Get,
                "https://www.baiscope.lk/movie-one/",
                200,
                r#"<a data-e-disable-page-transition="true" href="https://www.baiscope.lk/dl/77/">Download</a>"#,
            )
            .file(
                Method::Post,
                "https://www.baiscope.lk/dl/77/",
                &[
                    ("x-dlm-file-name", "Movie One.zip"),
                    ("Content-Disposition", "attachment; filename=\"other.zip\""),
                ],
                "zip",
            ),
    );
    let file = scraper
        .download(Source::Baiscopelk, "https://www.baiscope.lk/movie-one/")
        .await
        .unwrap();
    assert_eq!(file.filename, "Movie One.zip");
    assert_eq!(file.size(), 3);

    let seen = fetcher.seen.lock().unwrap();
    assert_eq!(seen[1].method, Method::Post);
    assert!(
        seen[1]
            .headers
            .iter()
            .any(|(name, value)| name == "Content-Type"
                && value == "application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn download_without_link_is_reported() {
    init();
    let (scraper, _) = scraper(CannedFetcher::default().page(
        Method::Get,
        "https://piratelk.com/post/",
        200,
        "<p>removed</p>",
    ));
    let err = scraper
        .download(Source::Piratelk, "https://piratelk.com/post/")
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::LinkNotFound { url } if url == "https://piratelk.com/post/"));
}

#[tokio::test]
async fn download_rejects_bad_post_url_and_failed_file() {
    init();
    let (scraper, _) = scraper(
        CannedFetcher::default()
            .page(
                Method::Get,
                "https://zoom.lk/post/",
                200,
                r#"<a class="download-button" href="https://zoom.lk/gone.zip">Download</a>"#,
            )
            .page(Method::Get, "https://zoom.lk/gone.zip", 404, "missing"),
    );
    let err = scraper.download(Source::Zoomlk, "not a url").await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidUrl { .. }));

    let err = scraper
        .download(Source::Zoomlk, "https://zoom.lk/post/")
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 404, .. }));
}

#[tokio::test]
async fn availability_needs_a_200_head() {
    init();
    let (scraper, fetcher) = scraper(
        CannedFetcher::default()
            .page(Method::Head, "https://cineru.lk/", 200, "")
            .page(Method::Head, "https://zoom.lk/", 503, ""),
    );
    assert!(scraper.is_available(Source::Cineru).await);
    assert!(!scraper.is_available(Source::Zoomlk).await);
    // No canned answer: the fetch itself fails.
    assert!(!scraper.is_available(Source::Piratelk).await);
    assert!(
        fetcher
            .seen
            .lock()
            .unwrap()
            .iter()
            .all(|request| request.method == Method::Head)
    );
}
