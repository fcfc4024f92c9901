//! Shared core for the `nowplay` widget: the now-playing data model, the
//! playlist-feed enricher, the per-tick reducer, and configuration.
//!
//! The binary crate owns the tick loop and the terminal; everything here is
//! plain data and async I/O with no rendering concerns.

pub mod config;
pub mod feed;
pub mod status;
