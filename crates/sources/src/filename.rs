//! Naming downloaded files from response headers or the download URL.

use crate::fetch::FetchResponse;
use crate::site::Source;
use regex::Regex;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

static EXTENDED_FILENAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)filename\*\s*=\s*UTF-8''([^;\s]+)"#).ok());
static PLAIN_FILENAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)filename\s*=\s*["']?([^"';]+)["']?"#).ok());

/// Name for a file fetched from `download_url`.
///
/// Tried in order: the site's own filename header, the RFC 5987
/// `filename*` parameter of `Content-Disposition`, its plain `filename`
/// parameter, the last path segment of the URL, and finally a
/// timestamped name.
pub fn derive_filename(source: Source, response: &FetchResponse, download_url: &Url) -> String {
    source
        .site()
        .filename_header
        .and_then(|header| response.header(header))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            response
                .header("Content-Disposition")
                .and_then(from_content_disposition)
        })
        .or_else(|| from_url(download_url))
        .unwrap_or_else(|| fallback_filename(source))
}

/// Filename carried by a `Content-Disposition` header value.
pub fn from_content_disposition(value: &str) -> Option<String> {
    if let Some(captures) = EXTENDED_FILENAME
        .as_ref()
        .and_then(|regex| regex.captures(value))
        && let Some(encoded) = captures.get(1)
        && let Ok(decoded) = urlencoding::decode(encoded.as_str())
        && !decoded.trim().is_empty()
    {
        return Some(decoded.trim().to_owned());
    }
    let captures = PLAIN_FILENAME
        .as_ref()
        .and_then(|regex| regex.captures(value))?;
    let name = captures.get(1)?.as_str().trim();
    (!name.is_empty()).then(|| name.to_owned())
}

/// Last non-empty path segment, percent-decoded.
pub fn from_url(url: &Url) -> Option<String> {
    let segment = url
        .path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())?;
    let decoded = urlencoding::decode(segment).ok()?;
    let name = decoded.trim();
    (!name.is_empty() && name != "." && name != "..").then(|| name.to_owned())
}

pub fn fallback_filename(source: Source) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    format!("{source}_subtitle_{secs}.zip")
}
