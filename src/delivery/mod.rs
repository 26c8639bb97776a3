//! Delivery queue and worker.
//!
//! ```text
//! Scanner → DeliveryQueue → DeliveryWorker → Sink
//!                 ↑               │
//!                 └── throttled ──┘
//! ```
//!
//! The queue is an unbounded channel. Any number of [`DeliveryQueue`]
//! handles may push; the single [`DeliveryWorker`] owns the receiving end
//! and is the only thing that ever takes items off it.

mod worker;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::{RelayError, Result};
use crate::domain::Notification;
use crate::sink::Sink;

pub use worker::DeliveryWorker;

/// Producer handle for the delivery queue.
#[derive(Clone)]
pub struct DeliveryQueue {
    tx: mpsc::UnboundedSender<Notification>,
}

impl DeliveryQueue {
    /// Append a notification to the tail of the queue.
    pub fn enqueue(&self, notification: Notification) -> Result<()> {
        self.tx
            .send(notification)
            .map_err(|_| RelayError::QueueClosed)
    }
}

/// Create a queue and the worker that drains it into `sink`, pausing
/// `send_interval` after every attempt.
pub fn delivery_queue(
    sink: Arc<dyn Sink + Send + Sync>,
    send_interval: Duration,
) -> (DeliveryQueue, DeliveryWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    let queue = DeliveryQueue { tx };
    let worker = DeliveryWorker::new(rx, queue.clone(), sink, send_interval);
    (queue, worker)
}

/// Spawn the worker loop as a tokio task.
pub fn spawn_delivery_worker(worker: DeliveryWorker) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        worker.run().await;
    })
}
