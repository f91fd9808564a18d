// File: ./src/scrape/mod.rs
// Listing extraction: pagination, card location, date lines and descriptions.
pub mod cards;
pub mod date;
pub mod description;
pub mod pagination;
pub mod text;

pub use cards::CardLocator;
pub use date::DateRecognizer;
pub use description::{DetailExtractor, join_descriptions, listing_description};
pub use pagination::{PageWalker, next_page_url};
