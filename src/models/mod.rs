//! Domain models for the note board.
//!
//! # Core Concepts
//!
//! - [`Note`]: one positioned card, the canonical record produced by the
//!   ingestion pipeline. Every surviving note has a non-empty `id` and a fully
//!   populated [`Position`].
//! - [`FeedSnapshot`]: the result of one load cycle, a label plus the ordered
//!   notes. Merging overrides produces a new snapshot; nothing mutates one in
//!   place.
//! - [`PartialPosition`]: the locally persisted edit for one note. Only the
//!   fields it carries win over the feed.

mod feed;
mod lenient;
mod note;
mod position;

pub use feed::*;
pub use note::*;
pub use position::*;
