//! Discord-style webhook sink.
//!
//! Posts `{"content": ...}` and maps the response:
//! - `204 No Content`: delivered
//! - `429 Too Many Requests`: throttled, wait taken from `Retry-After`
//!   (seconds or HTTP-date), then the JSON body's `retry_after`, then the
//!   configured default
//! - anything else: failed

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DeliveryOutcome, Sink};
use crate::app::Result;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: Option<f64>,
}

pub struct WebhookSink {
    url: String,
    client: Client,
    default_retry_after: Duration,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration, default_retry_after: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
            default_retry_after,
        })
    }
}

#[async_trait]
impl Sink for WebhookSink {
    async fn notify(&self, message: &str) -> DeliveryOutcome {
        let response = match self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content: message })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return DeliveryOutcome::Failed(format!("request failed: {}", e)),
        };

        let status = response.status();
        match status {
            StatusCode::NO_CONTENT => DeliveryOutcome::Delivered,
            StatusCode::TOO_MANY_REQUESTS => {
                let header = retry_after_header(response.headers(), Utc::now());
                let body = response.bytes().await.ok();
                let retry_after = header
                    .or_else(|| body.as_deref().and_then(retry_after_body))
                    .unwrap_or(self.default_retry_after);
                debug!("Webhook rate limited, retry after {:?}", retry_after);
                DeliveryOutcome::Throttled { retry_after }
            }
            _ => DeliveryOutcome::Failed(format!("unexpected status {}", status)),
        }
    }
}

/// `Retry-After` as delay-seconds (fractional allowed) or as an HTTP-date.
/// A date already in the past means no wait.
fn retry_after_header(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = value.parse::<f64>() {
        return seconds(secs);
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    Some(
        at.signed_duration_since(now)
            .to_std()
            .unwrap_or(Duration::ZERO),
    )
}

fn retry_after_body(body: &[u8]) -> Option<Duration> {
    let parsed: RateLimitBody = serde_json::from_slice(body).ok()?;
    seconds(parsed.retry_after?)
}

fn seconds(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}
