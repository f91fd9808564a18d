// File: ./src/client/page.rs
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static BASE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("base[href]").expect("static selector"));

/// One fetched and parsed HTML page. Dropped as soon as its cards have been
/// extracted.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// `url` is the address the content was served from (after redirects).
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// URL that relative links on this page are resolved against: a
    /// `<base href>` if the page declares one, otherwise the page's own URL.
    pub fn base_url(&self) -> Url {
        self.document
            .select(&BASE_SELECTOR)
            .next()
            .and_then(|base| base.value().attr("href"))
            .and_then(|href| self.url.join(href.trim()).ok())
            .unwrap_or_else(|| self.url.clone())
    }

    /// Resolves an `href` value to an absolute http(s) URL. Empty values and
    /// non-web schemes (`mailto:`, `javascript:`, ...) are unresolvable.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let resolved = self.base_url().join(href).ok()?;
        matches!(resolved.scheme(), "http" | "https").then_some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        Page::parse(Url::parse("https://roulette.org/calendar/").unwrap(), html)
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let p = page("<html><body></body></html>");
        assert_eq!(
            p.resolve("/e/1").unwrap().as_str(),
            "https://roulette.org/e/1"
        );
        assert_eq!(
            p.resolve("page/2/").unwrap().as_str(),
            "https://roulette.org/calendar/page/2/"
        );
        assert_eq!(
            p.resolve("https://other.test/x").unwrap().as_str(),
            "https://other.test/x"
        );
    }

    #[test]
    fn test_unresolvable_hrefs() {
        let p = page("<html><body></body></html>");
        assert!(p.resolve("").is_none());
        assert!(p.resolve("   ").is_none());
        assert!(p.resolve("mailto:box@roulette.org").is_none());
        assert!(p.resolve("javascript:void(0)").is_none());
    }

    #[test]
    fn test_base_element_overrides_page_url() {
        let p = page(r#"<html><head><base href="https://cdn.test/site/"></head><body></body></html>"#);
        assert_eq!(
            p.resolve("e/1").unwrap().as_str(),
            "https://cdn.test/site/e/1"
        );
    }
}
