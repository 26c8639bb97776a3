//! Test doubles shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::app::{RelayError, Result};
use crate::fetcher::{FetchResult, Fetcher};
use crate::sink::{DeliveryOutcome, Sink};

/// Sink that records every call and replays scripted outcomes, then
/// reports `Delivered` once the script runs out.
pub struct RecordingSink {
    outcomes: Mutex<VecDeque<DeliveryOutcome>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    pub fn with_outcomes(outcomes: Vec<DeliveryOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    async fn notify(&self, message: &str) -> DeliveryOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((message.to_string(), Instant::now()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DeliveryOutcome::Delivered)
    }
}

/// Fetcher serving canned bodies by URL. Unknown URLs fail.
pub struct StaticFetcher {
    bodies: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self {
            bodies: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_feed(self, url: &str, body: impl Into<String>) -> Self {
        self.set_feed(url, body);
        self
    }

    pub fn set_feed(&self, url: &str, body: impl Into<String>) {
        self.bodies.lock().unwrap().insert(url.to_string(), body.into());
    }

    /// URLs requested so far, with the `If-None-Match` value sent.
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(
        &self,
        url: &str,
        etag: Option<&str>,
        _last_modified: Option<&str>,
    ) -> Result<FetchResult> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), etag.map(String::from)));

        let body = self
            .bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| RelayError::Other(format!("connection refused: {}", url)))?;

        let tag = format!("\"{}\"", body.len());
        if etag == Some(tag.as_str()) {
            return Ok(FetchResult::NotModified);
        }

        Ok(FetchResult::Content {
            body: body.into_bytes(),
            etag: Some(tag),
            last_modified: None,
        })
    }
}

/// Minimal RSS document with one `<item>` per `(guid, title, link)`.
pub fn rss(items: &[(Option<&str>, &str, &str)]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\"><channel><title>Test</title>\n",
    );
    for (guid, title, link) in items {
        body.push_str("<item>");
        if let Some(guid) = guid {
            body.push_str(&format!("<guid>{}</guid>", guid));
        }
        body.push_str(&format!("<title>{}</title><link>{}</link></item>\n", title, link));
    }
    body.push_str("</channel></rss>");
    body
}
