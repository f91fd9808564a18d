// File: ./src/model.rs
// Records flowing through the listing pipeline.
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use url::Url;
use uuid::Uuid;

/// What one event card on a listing page yields before date parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub title: String,
    /// Last card fragment matching the date grammar, if any.
    pub date_line: Option<String>,
    pub url: Url,
    /// Marker fragment through the end of the card, newline-joined. Empty
    /// when the card has no marker.
    pub listing_description: String,
}

/// A calendar event. Constructed once by the pipeline and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    title: String,
    start: DateTime<Tz>,
    duration: Duration,
    location: String,
    url: Url,
    description: Option<String>,
}

impl Event {
    pub fn new(
        title: String,
        start: DateTime<Tz>,
        duration: Duration,
        location: String,
        url: Url,
        description: Option<String>,
    ) -> Self {
        Self {
            title,
            start,
            duration,
            location,
            url,
            // An empty description is the same as none.
            description: description.filter(|d| !d.is_empty()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.start + self.duration
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Stable identifier derived from the event page and start instant, so
    /// regenerating the feed from the same listing yields the same UIDs.
    pub fn uid(&self) -> String {
        let key = format!("{}#{}", self.url, self.start_utc().to_rfc3339());
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes()).to_string()
    }
}
