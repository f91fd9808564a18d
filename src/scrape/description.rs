// File: ./src/scrape/description.rs
// Listing-side description slicing and best-effort detail-page enrichment.
use crate::client::{Page, PageFetcher};
use crate::config::Config;
use crate::scrape::text::text_fragments;
use scraper::{Html, Selector};
use url::Url;

/// Fragments from the first one starting with `marker` (case-insensitive) to
/// the end of the card, newline-joined. Empty if no fragment starts with it.
pub fn listing_description<S: AsRef<str>>(fragments: &[S], marker: &str) -> String {
    let marker = marker.to_lowercase();
    fragments
        .iter()
        .position(|t| t.as_ref().to_lowercase().starts_with(&marker))
        .map(|idx| {
            fragments[idx..]
                .iter()
                .map(AsRef::<str>::as_ref)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Listing text, then a blank line, then detail text. Either side may be
/// missing; `None` when both are.
pub fn join_descriptions(listing: &str, detail: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [Some(listing.trim()), detail.map(str::trim)]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

/// One way of finding the article body on a detail page. Returns every
/// candidate body it recognizes, in document order.
pub trait ContentStrategy {
    fn name(&self) -> &'static str;
    fn candidates(&self, document: &Html) -> Vec<String>;
}

/// Text of every element matching one of a list of container selectors.
pub struct ContainerStrategy {
    selectors: Vec<Selector>,
}

impl ContainerStrategy {
    /// Selectors that fail to parse are skipped; `Config::validate` reports them.
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Self {
        let selectors = selectors
            .iter()
            .filter_map(|s| Selector::parse(s.as_ref()).ok())
            .collect();
        Self { selectors }
    }
}

impl ContentStrategy for ContainerStrategy {
    fn name(&self) -> &'static str {
        "containers"
    }

    fn candidates(&self, document: &Html) -> Vec<String> {
        self.selectors
            .iter()
            .flat_map(|sel| document.select(sel))
            .map(|node| text_fragments(node).join("\n").trim().to_string())
            .collect()
    }
}

/// Every paragraph of the page as one block. Used when no known container
/// survives, e.g. after a theme change drops the `article` wrapper.
pub struct ParagraphStrategy {
    selector: Selector,
}

impl Default for ParagraphStrategy {
    fn default() -> Self {
        Self {
            selector: Selector::parse("p").expect("static selector"),
        }
    }
}

impl ContentStrategy for ParagraphStrategy {
    fn name(&self) -> &'static str {
        "paragraphs"
    }

    fn candidates(&self, document: &Html) -> Vec<String> {
        let paragraphs: Vec<String> = document
            .select(&self.selector)
            .map(|p| text_fragments(p).join(" "))
            .filter(|p| !p.is_empty())
            .collect();
        if paragraphs.is_empty() {
            Vec::new()
        } else {
            vec![paragraphs.join("\n")]
        }
    }
}

/// Picks the detail-page description from prioritized strategies.
pub struct DetailExtractor {
    strategies: Vec<Box<dyn ContentStrategy>>,
    min_chars: usize,
}

impl DetailExtractor {
    pub fn new(strategies: Vec<Box<dyn ContentStrategy>>, min_chars: usize) -> Self {
        Self {
            strategies,
            min_chars,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            vec![
                Box::new(ContainerStrategy::new(&config.detail_selectors)),
                Box::new(ParagraphStrategy::default()),
            ],
            config.detail_min_chars,
        )
    }

    /// The first strategy with a candidate longer than the minimum wins; its
    /// longest such candidate is returned (earliest one on ties). Shorter
    /// candidates are menus and other boilerplate.
    pub fn extract(&self, document: &Html) -> Option<String> {
        for strategy in &self.strategies {
            let best = strategy
                .candidates(document)
                .into_iter()
                .map(|c| (c.chars().count(), c))
                .filter(|(len, _)| *len > self.min_chars)
                .fold(None::<(usize, String)>, |best, (len, c)| match best {
                    Some((best_len, _)) if best_len >= len => best,
                    _ => Some((len, c)),
                });
            if let Some((len, body)) = best {
                log::debug!("Detail content via {} ({} chars)", strategy.name(), len);
                return Some(body);
            }
        }
        None
    }

    pub fn extract_page(&self, page: &Page) -> Option<String> {
        self.extract(page.document())
    }

    /// Fetches the event's own page and extracts its description. Any
    /// failure, including the fetch itself, yields `None`.
    pub async fn fetch(&self, fetcher: &PageFetcher, url: &Url) -> Option<String> {
        match fetcher.fetch(url).await {
            Ok(page) => self.extract_page(&page),
            Err(e) => {
                log::debug!("No detail description for {}: {}", url, e);
                None
            }
        }
    }
}
