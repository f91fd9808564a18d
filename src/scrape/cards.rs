// File: ./src/scrape/cards.rs
// Finds event cards on a listing page. The site has no stable class names,
// so a card is any heading that carries a link, plus whatever sits next to
// that heading under the same parent.
use crate::client::Page;
use crate::config::Config;
use crate::model::ListingItem;
use crate::scrape::date::DateRecognizer;
use crate::scrape::description::listing_description;
use crate::scrape::text::{inline_text, text_fragments};
use anyhow::Result;
use scraper::{ElementRef, Selector};

pub struct CardLocator {
    heading: Selector,
    anchor: Selector,
    marker: String,
}

impl CardLocator {
    pub fn new(heading_selector: &str, marker: &str) -> Result<Self> {
        let heading = Selector::parse(heading_selector).map_err(|e| {
            anyhow::anyhow!("Invalid heading selector '{}': {:?}", heading_selector, e)
        })?;
        let anchor = Selector::parse("a[href]")
            .map_err(|e| anyhow::anyhow!("Invalid anchor selector: {:?}", e))?;
        Ok(Self {
            heading,
            anchor,
            marker: marker.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.heading_selector, &config.listing_marker)
    }

    /// The heading's parent element when it has one, otherwise the heading.
    fn card_root(heading: ElementRef<'_>) -> ElementRef<'_> {
        heading
            .parent()
            .and_then(ElementRef::wrap)
            .unwrap_or(heading)
    }

    /// One item per linked heading, in document order. Headings without a
    /// link, or whose link does not resolve, produce nothing.
    pub fn locate(&self, page: &Page) -> Vec<ListingItem> {
        page.document()
            .select(&self.heading)
            .filter_map(|heading| self.item_for(page, heading))
            .collect()
    }

    fn item_for(&self, page: &Page, heading: ElementRef<'_>) -> Option<ListingItem> {
        let anchor = heading.select(&self.anchor).next()?;
        let url = page.resolve(anchor.value().attr("href")?)?;

        let mut title = inline_text(anchor);
        if title.is_empty() {
            // Image-only links: the heading may still carry text of its own.
            title = inline_text(heading);
        }

        let fragments = text_fragments(Self::card_root(heading));
        let date_line = DateRecognizer::find_date_line(&fragments).map(str::to_string);

        Some(ListingItem {
            title,
            date_line,
            url,
            listing_description: listing_description(&fragments, &self.marker),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(body: &str) -> Page {
        Page::parse(
            Url::parse("https://roulette.org/calendar/").unwrap(),
            &format!("<html><body>{}</body></html>", body),
        )
    }

    fn locator() -> CardLocator {
        CardLocator::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_card_collects_sibling_text() {
        let items = locator().locate(&page(
            r#"<div class="event">
                 <h2><a href="/e/1">Show A</a></h2>
                 <p>Saturday, November 1, 2025. 8:00 pm</p>
                 <p>Tickets $20</p>
                 <p>Members $15</p>
               </div>"#,
        ));
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "Show A");
        assert_eq!(item.url.as_str(), "https://roulette.org/e/1");
        assert_eq!(
            item.date_line.as_deref(),
            Some("Saturday, November 1, 2025. 8:00 pm")
        );
        assert_eq!(item.listing_description, "Tickets $20\nMembers $15");
    }

    #[test]
    fn test_heading_without_link_is_skipped() {
        let items = locator().locate(&page(
            r#"<div><h2>Upcoming</h2><p>Saturday, November 1, 2025. 8:00 pm</p></div>
               <div><h2><a>No target</a></h2></div>
               <div><h2><a href="">Empty target</a></h2></div>"#,
        ));
        assert!(items.is_empty());
    }

    #[test]
    fn test_cards_are_separated_by_parent() {
        let items = locator().locate(&page(
            r#"<div><h2><a href="/e/1">One</a></h2><p>Saturday, November 1, 2025. 8:00 pm</p></div>
               <div><h2><a href="https://roulette.org/e/2">Two</a></h2><p>Sunday, November 2, 2025. 3:00 pm</p></div>
               <div><h2><a href="/e/3">Three</a></h2><p>TBA</p></div>"#,
        ));
        let got: Vec<_> = items
            .iter()
            .map(|i| (i.title.as_str(), i.date_line.as_deref()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("One", Some("Saturday, November 1, 2025. 8:00 pm")),
                ("Two", Some("Sunday, November 2, 2025. 3:00 pm")),
                ("Three", None),
            ]
        );
    }

    #[test]
    fn test_image_link_falls_back_to_heading_text() {
        let items = locator().locate(&page(
            r#"<div><h2><a href="/e/9"><img src="x.jpg"></a> Late Set</h2></div>"#,
        ));
        assert_eq!(items[0].title, "Late Set");
    }

    #[test]
    fn test_custom_heading_selector() {
        let locator = CardLocator::new("h3.title", "Tickets").unwrap();
        let items = locator.locate(&page(
            r#"<li><h3 class="title"><a href="/e/4">Four</a></h3></li><li><h2><a href="/e/5">Five</a></h2></li>"#,
        ));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Four");
    }
}
