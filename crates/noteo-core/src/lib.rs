//! Noteo Core Library
//!
//! Markdown notes with YAML front matter, tags, and a concurrent pipeline for
//! walking, filtering and sorting them.

pub mod date;
pub mod error;
pub mod lazy;
pub mod logging;
pub mod note;
pub mod notes;
pub mod paths;
pub mod repository;
pub mod tag;
