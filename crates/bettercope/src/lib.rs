#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Subtitle search across several sites at once.
//!
//! [`SubtitleService`] fans a query out to every requested source, either
//! collecting all results or streaming them as [`SearchEvent`]s, and
//! downloads single files or zip bundles.

pub mod bundle;
pub mod cli;
mod error;
mod events;
mod service;

pub use error::ServiceError;
pub use events::SearchEvent;
pub use service::{SubtitleService, split_sources};
