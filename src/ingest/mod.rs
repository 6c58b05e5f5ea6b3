//! Ingestion pipeline: link normalization, fetch, delimited-text parsing and
//! row mapping.
//!
//! ```text
//! sheet link -> locator::normalize -> fetch -> tabular::parse -> mapper::map_rows
//! ```

mod client;
pub mod locator;
pub mod mapper;
pub mod tabular;

pub use client::{looks_like_html, FeedError, FeedLoader, FeedSource};
pub use locator::normalize;
pub use mapper::{csv_to_feed, map_rows, parse_number, Field, Header};
pub use tabular::{parse, Delimiter};
