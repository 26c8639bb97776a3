//! One pass over the configured feeds.
//!
//! ```text
//! FeedSource → Fetcher → Normalizer → IdentityKey → SeenSet? → DeliveryQueue
//! ```
//!
//! A feed that fails to fetch or parse is logged and skipped; the rest of
//! the pass carries on.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::Result;
use crate::delivery::DeliveryQueue;
use crate::domain::{FeedSource, Notification, SeenSet};
use crate::fetcher::{FetchResult, Fetcher};
use crate::identity::IdentityKey;
use crate::normalizer::Normalizer;

/// Conditional-request validators from the last successful fetch.
#[derive(Debug, Clone, Default)]
struct Validators {
    etag: Option<String>,
    last_modified: Option<String>,
}

/// Outcome counters for one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub feeds_scanned: usize,
    pub feeds_failed: usize,
    pub queued: usize,
}

impl ScanReport {
    pub fn all_failed(&self) -> bool {
        self.feeds_scanned > 0 && self.feeds_failed == self.feeds_scanned
    }
}

pub struct FeedScanner {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    validators: HashMap<FeedSource, Validators>,
}

impl FeedScanner {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, normalizer: Normalizer) -> Self {
        Self {
            fetcher,
            normalizer,
            validators: HashMap::new(),
        }
    }

    /// Scan `sources` in order, recording new keys in `seen` and queueing a
    /// notification for each.
    pub async fn scan(
        &mut self,
        sources: &[FeedSource],
        seen: &mut SeenSet,
        queue: &DeliveryQueue,
    ) -> ScanReport {
        let mut report = ScanReport::default();

        for source in sources {
            info!("Checking feed: {}", source);
            report.feeds_scanned += 1;

            match self.scan_feed(source, seen, queue).await {
                Ok(count) => {
                    if count > 0 {
                        info!("  {} new entries from {}", count, source);
                    }
                    report.queued += count;
                }
                Err(e) => {
                    warn!("  Error checking {}: {}", source, e);
                    report.feeds_failed += 1;
                }
            }
        }

        report
    }

    async fn scan_feed(
        &mut self,
        source: &FeedSource,
        seen: &mut SeenSet,
        queue: &DeliveryQueue,
    ) -> Result<usize> {
        let cached = self.validators.get(source).cloned().unwrap_or_default();
        let result = self
            .fetcher
            .fetch(
                source.as_str(),
                cached.etag.as_deref(),
                cached.last_modified.as_deref(),
            )
            .await?;

        let (entries, validators) = match result {
            FetchResult::NotModified => {
                debug!("Feed {} not modified", source);
                return Ok(0);
            }
            FetchResult::Content {
                body,
                etag,
                last_modified,
            } => (
                self.normalizer.normalize(&body)?,
                Validators {
                    etag,
                    last_modified,
                },
            ),
        };

        let mut queued = 0;
        for entry in &entries {
            let key = IdentityKey::derive(source, entry);
            if seen.contains(&key) {
                continue;
            }

            let notification = Notification::from_entry(entry);
            info!("Queuing: {}", notification.title);
            queue.enqueue(notification)?;
            seen.insert(key);
            queued += 1;
        }

        // Only a fully enqueued body may be skipped with a 304 next time.
        self.validators.insert(source.clone(), validators);
        Ok(queued)
    }
}
