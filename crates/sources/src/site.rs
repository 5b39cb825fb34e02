//! The supported sites and the selectors that drive each of them.

use crate::error::SourceError;
use crate::fetch::Method;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A subtitle site. Serialises as its lowercase name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Baiscopelk,
    Cineru,
    Piratelk,
    Zoomlk,
}

impl Source {
    /// Every source, in table order.
    pub const ALL: [Self; 4] = [Self::Baiscopelk, Self::Cineru, Self::Piratelk, Self::Zoomlk];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Baiscopelk => "baiscopelk",
            Self::Cineru => "cineru",
            Self::Piratelk => "piratelk",
            Self::Zoomlk => "zoomlk",
        }
    }

    pub fn site(self) -> &'static SiteConfig {
        match self {
            Self::Baiscopelk => &BAISCOPELK,
            Self::Cineru => &CINERU,
            Self::Piratelk => &PIRATELK,
            Self::Zoomlk => &ZOOMLK,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = SourceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.name() == name)
            .ok_or_else(|| SourceError::UnknownSource(name.to_owned()))
    }
}

/// How to scrape one site. Selectors use the `css_selectors` grammar.
#[derive(Debug, PartialEq, Eq)]
pub struct SiteConfig {
    /// Scheme and host, without a trailing slash.
    pub base_url: &'static str,
    /// One match per search result.
    pub result_selector: &'static str,
    /// Link inside a result whose `href` is the post URL. `None` means the
    /// result element is the link.
    pub link_selector: Option<&'static str>,
    /// Element inside a result holding the title. `None` means the result
    /// element itself.
    pub title_selector: Option<&'static str>,
    /// Results whose title or URL contains any of these are dropped.
    pub ignore_patterns: &'static [&'static str],
    /// Element on a post page carrying the download URL.
    pub download_selector: &'static str,
    /// Attribute of that element holding the URL.
    pub download_attr: &'static str,
    pub download_method: Method,
    /// Extra headers for the download request.
    pub download_headers: &'static [(&'static str, &'static str)],
    /// Response header naming the file, checked before `Content-Disposition`.
    pub filename_header: Option<&'static str>,
}

static BAISCOPELK: SiteConfig = SiteConfig {
    base_url: "https://www.baiscope.lk",
    result_selector: "article.elementor-post",
    link_selector: Some("a.elementor-post__thumbnail__link, h5.elementor-post__title a"),
    title_selector: Some("h5.elementor-post__title"),
    ignore_patterns: &["Collection"],
    download_selector: "a[data-e-disable-page-transition=true]",
    download_attr: "href",
    download_method: Method::Post,
    download_headers: &[("Content-Type", "application/x-www-form-urlencoded")],
    filename_header: Some("X-Dlm-File-Name"),
};

static CINERU: SiteConfig = SiteConfig {
    base_url: "https://cineru.lk",
    result_selector: ".item-list .post-box-title a",
    link_selector: None,
    title_selector: None,
    ignore_patterns: &["Collection", "tv_series"],
    download_selector: "#btn-download",
    download_attr: "data-link",
    download_method: Method::Get,
    download_headers: &[],
    filename_header: None,
};

static PIRATELK: SiteConfig = SiteConfig {
    base_url: "https://piratelk.com",
    result_selector: ".item-list .post-box-title a",
    link_selector: None,
    title_selector: None,
    ignore_patterns: &["Collection"],
    download_selector: ".download-button",
    download_attr: "href",
    download_method: Method::Get,
    download_headers: &[],
    filename_header: None,
};

static ZOOMLK: SiteConfig = SiteConfig {
    base_url: "https://zoom.lk",
    result_selector: ".td-ss-main-content .item-details .entry-title a",
    link_selector: None,
    title_selector: None,
    ignore_patterns: &["Collection"],
    download_selector: ".download-button",
    download_attr: "href",
    download_method: Method::Get,
    download_headers: &[],
    filename_header: None,
};
