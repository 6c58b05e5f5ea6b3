//! Weekly note board core.
//!
//! Turns a published spreadsheet (or a local JSON document) into positioned
//! notes, layers locally persisted position edits on top for privileged
//! sessions, and maps pointer geometry onto the board's percent space.

pub mod board;
pub mod capability;
pub mod config;
pub mod export;
pub mod geometry;
pub mod ingest;
pub mod models;
pub mod overrides;
pub mod render;
