// File: ./src/client/mod.rs
pub mod fetcher;
pub mod middleware;
pub mod page;
pub mod redirect;

pub use crate::client::fetcher::PageFetcher;
pub use crate::client::page::Page;
