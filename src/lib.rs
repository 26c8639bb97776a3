//! # Rivulet Relay
//!
//! Watches RSS/Atom feeds and posts every new entry to a webhook.
//!
//! ## Architecture
//!
//! ```text
//! Daemon → Scanner → Fetcher → Normalizer → Identity → SeenSet
//!                                                         ↓
//!                               Sink ← DeliveryWorker ← DeliveryQueue
//! ```
//!
//! - [`daemon`]: scan loop and delivery worker, started once
//! - [`scanner`]: one pass over the feed list
//! - [`identity`]: stable per-entry deduplication keys
//! - [`store`]: flat-file seen-set persistence
//! - [`delivery`]: paced queue with throttle backoff
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a config with your webhook URL, list feeds in rss.txt, then
//! rivulet-relay run
//!
//! # Or check once and exit
//! rivulet-relay once --config relay.toml
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct builds every collaborator
/// from a [`Config`](config::Config): fetcher, seen-set store, sinks.
pub mod app;

/// Command-line interface using clap.
///
/// - `run` - Check feeds on a schedule (default)
/// - `once` - Check once, deliver, exit
pub mod cli;

/// TOML configuration and interval parsing.
pub mod config;

/// Cycle coordinator: the scan loop, the delivery worker and the
/// one-shot start guard.
pub mod daemon;

/// Delivery queue and the paced worker that drains it.
pub mod delivery;

/// Core domain models.
///
/// - [`FeedSource`](domain::FeedSource): a configured feed URL
/// - [`Entry`](domain::Entry): one parsed feed entry
/// - [`Notification`](domain::Notification): a pending announcement
/// - [`SeenSet`](domain::SeenSet): keys already announced
pub mod domain;

/// HTTP fetching with conditional request support.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

pub mod identity;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into [`Entry`](domain::Entry) records.
pub mod normalizer;

pub mod scanner;

/// Outbound notification sinks.
pub mod sink;

/// Seen-set persistence.
///
/// - [`SeenStore`](store::SeenStore): load/save trait
/// - [`FileSeenStore`](store::FileSeenStore): one key per line, atomic rewrite
pub mod store;

#[cfg(test)]
mod testing;
