// File: ./src/scrape/pagination.rs
use crate::client::{Page, PageFetcher};
use crate::error::FetchError;
use crate::scrape::text::inline_text;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use url::Url;

static NEXT_PAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)next\s+page").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Target of the first anchor whose text reads "Next page". `None` when
/// there is no such anchor, or the first one has no usable href.
pub fn next_page_url(page: &Page) -> Option<Url> {
    let anchor = page
        .document()
        .select(&ANCHOR)
        .find(|a| NEXT_PAGE_RE.is_match(&inline_text(*a)))?;
    page.resolve(anchor.value().attr("href")?)
}

/// Walks a listing by following "Next page" links, one fetch at a time.
///
/// The walk ends after `max_pages` pages even if more links are advertised,
/// which also stops pagination cycles. After a failed fetch or a page with
/// no next link the walker is exhausted; it cannot be restarted.
pub struct PageWalker<'a> {
    fetcher: &'a PageFetcher,
    next_url: Option<Url>,
    remaining: usize,
    fetched: usize,
}

impl<'a> PageWalker<'a> {
    pub fn new(fetcher: &'a PageFetcher, start: Url, max_pages: usize) -> Self {
        Self {
            fetcher,
            next_url: Some(start),
            remaining: max_pages,
            fetched: 0,
        }
    }

    pub async fn next_page(&mut self) -> Option<Result<Page, FetchError>> {
        if self.remaining == 0 {
            if let Some(url) = self.next_url.take() {
                log::info!("Page cap reached; not following {}", url);
            }
            return None;
        }
        let url = self.next_url.take()?;
        self.remaining -= 1;

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => return Some(Err(e)),
        };
        self.fetched += 1;
        self.next_url = next_page_url(&page);
        log::debug!(
            "Page {} fetched from {}; next: {}",
            self.fetched,
            page.url(),
            self.next_url.as_ref().map_or("none", Url::as_str)
        );
        Some(Ok(page))
    }

    /// Pages fetched successfully so far.
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }
}
