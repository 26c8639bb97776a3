//! Outbound notification channel.
//!
//! A [`Sink`] accepts a rendered message and reports one of three
//! outcomes. The worker decides what to do with each; sinks never retry.

pub mod webhook;

use std::time::Duration;

use async_trait::async_trait;

pub use webhook::WebhookSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The sink accepted the message.
    Delivered,
    /// The sink asked us to slow down and come back after `retry_after`.
    Throttled { retry_after: Duration },
    /// Transport error or unexpected response.
    Failed(String),
}

#[async_trait]
pub trait Sink {
    async fn notify(&self, message: &str) -> DeliveryOutcome;
}
