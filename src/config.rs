use std::time::Duration;

use eyre::Result;
use reqwest::header::{self, HeaderMap, HeaderValue};
use url::Url;

/// Pincode used for the Bangalore region.
pub const BANGALORE_PINCODE: &str = "560001";
/// Pincode used for the Delhi region.
pub const DELHI_PINCODE: &str = "110001";

const DEFAULT_BASE_URL: &str = "https://www.amazon.in";
const DEFAULT_QUERY: &str = "laptops";

/// Builds the default headers for the client.
pub fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    // swap the user agent if the host keeps answering 503
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers
}

/// Settings shared by every stage of a scrape.
///
/// Built once and never mutated; workers receive it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Site root, listing and detail URLs are resolved against it.
    pub base_url: Url,
    /// Search term sent as the `k` parameter.
    pub query: String,
    /// Headers attached to every request.
    pub headers: HeaderMap,
    /// Attempts made per URL before giving up.
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
    /// Upper bound on listing pages fetched at the same time.
    pub concurrency: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            query: DEFAULT_QUERY.into(),
            headers: build_headers(),
            max_retries: 10,
            retry_delay: Duration::from_secs(5),
            concurrency: 10,
        }
    }
}

impl ScraperConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// URL of the search results page `page` for `region`.
    pub fn listing_url(&self, region: &str, page: usize) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("s");
        }
        url.query_pairs_mut()
            .append_pair("k", &self.query)
            .append_pair("page", &page.to_string())
            .append_pair("location", region);
        url
    }

    /// Resolves a listing card's `href` into an absolute detail page URL.
    ///
    /// Site-relative links are appended to the base URL's path.
    pub fn detail_url(&self, href: &str) -> Result<Url> {
        if Url::parse(href).is_ok() || href.starts_with("//") {
            return Ok(self.base_url.join(href)?);
        }
        Ok(self.base_dir().join(href.trim_start_matches('/'))?)
    }

    /// Base URL with a trailing slash, so joins extend its path.
    fn base_dir(&self) -> Url {
        let mut base = self.base_url.clone();
        base.set_query(None);
        base.set_fragment(None);
        if let Ok(mut segments) = base.path_segments_mut() {
            segments.pop_if_empty().push("");
        }
        base
    }
}
