// File: ./src/pipeline.rs
// Drives the listing walk and turns cards into events.
use crate::client::PageFetcher;
use crate::config::Config;
use crate::model::{Event, ListingItem};
use crate::scrape::{CardLocator, DateRecognizer, DetailExtractor, PageWalker, join_descriptions};
use anyhow::{Context, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};

/// Outcome of one run. Counts are informational only.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub events: Vec<Event>,
    pub pages: usize,
    pub cards: usize,
    /// Cards with no line matching the date grammar.
    pub missing_date: usize,
    /// Cards whose date line matched but did not parse.
    pub invalid_date: usize,
    /// Events that got a detail-page description.
    pub enriched: usize,
    /// Set when a page after the first failed and the walk stopped there.
    pub stopped_early: Option<String>,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    fetcher: &'a PageFetcher,
    cards: CardLocator,
    dates: DateRecognizer,
    details: DetailExtractor,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, fetcher: &'a PageFetcher) -> Result<Self> {
        Ok(Self {
            config,
            fetcher,
            cards: CardLocator::from_config(config)?,
            dates: DateRecognizer::new(config.tz()?),
            details: DetailExtractor::from_config(config),
        })
    }

    /// Walks the listing and builds every event it can.
    ///
    /// Only a failure to fetch the first page is an error. A later page
    /// failing ends pagination and keeps what was collected so far; cards
    /// without a usable date are skipped; detail pages are best-effort.
    pub async fn run(&self) -> Result<BuildReport> {
        let start_url = self.config.base_url()?;
        let mut walker = PageWalker::new(self.fetcher, start_url.clone(), self.config.max_pages);
        let mut report = BuildReport::default();

        while let Some(result) = walker.next_page().await {
            let page = match result {
                Ok(page) => page,
                Err(e) if walker.pages_fetched() == 0 => {
                    return Err(e).with_context(|| {
                        format!("Failed to fetch first listing page {}", start_url)
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Stopping pagination after {} pages: {}",
                        walker.pages_fetched(),
                        e
                    );
                    report.stopped_early = Some(e.to_string());
                    break;
                }
            };

            let items = self.cards.locate(&page);
            log::info!("{}: {} event cards", page.url(), items.len());
            drop(page);
            report.cards += items.len();

            let mut dated = Vec::with_capacity(items.len());
            for item in items {
                if let Some(start) = self.start_of(&item, &mut report) {
                    dated.push((item, start));
                }
            }

            let built: Vec<(Event, bool)> = stream::iter(
                dated
                    .into_iter()
                    .map(|(item, start)| self.synthesize(item, start)),
            )
            .buffered(self.config.detail_concurrency.max(1))
            .collect()
            .await;

            for (event, enriched) in built {
                if enriched {
                    report.enriched += 1;
                }
                report.events.push(event);
            }
        }

        report.pages = walker.pages_fetched();
        log::info!(
            "{} pages, {} cards, {} events ({} without date line, {} unparsable, {} with detail text)",
            report.pages,
            report.cards,
            report.events.len(),
            report.missing_date,
            report.invalid_date,
            report.enriched
        );
        Ok(report)
    }

    fn start_of(&self, item: &ListingItem, report: &mut BuildReport) -> Option<DateTime<Tz>> {
        let Some(line) = item.date_line.as_deref() else {
            log::debug!("No date line for '{}'; skipped", item.title);
            report.missing_date += 1;
            return None;
        };
        match self.dates.parse(line) {
            Ok(start) => Some(start),
            Err(e) => {
                log::info!("Skipping '{}': {}", item.title, e);
                report.invalid_date += 1;
                None
            }
        }
    }

    /// Listing and detail descriptions are assembled together here, so an
    /// event is only ever constructed with its final description.
    async fn synthesize(&self, item: ListingItem, start: DateTime<Tz>) -> (Event, bool) {
        let detail = if self.config.fetch_details {
            self.details.fetch(self.fetcher, &item.url).await
        } else {
            None
        };
        let enriched = detail.is_some();
        let description = join_descriptions(&item.listing_description, detail.as_deref());

        let event = Event::new(
            item.title,
            start,
            self.config.event_duration(),
            self.config.location.clone(),
            item.url,
            description,
        );
        (event, enriched)
    }
}

/// Convenience entry point: one full run with the given configuration.
pub async fn build_events(config: &Config, fetcher: &PageFetcher) -> Result<BuildReport> {
    Pipeline::new(config, fetcher)?.run().await
}
