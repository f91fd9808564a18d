// Crate root library declaration and module exports.
pub mod calendar;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod scrape;

pub use calendar::CalendarWriter;
pub use client::PageFetcher;
pub use config::Config;
pub use error::{DateParseError, FetchError};
pub use model::{Event, ListingItem};
pub use pipeline::{BuildReport, Pipeline, build_events};
