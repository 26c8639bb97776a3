use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::DeliveryQueue;
use crate::domain::Notification;
use crate::sink::{DeliveryOutcome, Sink};

/// Paced consumer of the delivery queue.
pub struct DeliveryWorker {
    rx: mpsc::UnboundedReceiver<Notification>,
    requeue: DeliveryQueue,
    sink: Arc<dyn Sink + Send + Sync>,
    send_interval: Duration,
    max_throttle_retries: Option<u32>,
}

impl DeliveryWorker {
    pub(super) fn new(
        rx: mpsc::UnboundedReceiver<Notification>,
        requeue: DeliveryQueue,
        sink: Arc<dyn Sink + Send + Sync>,
        send_interval: Duration,
    ) -> Self {
        Self {
            rx,
            requeue,
            sink,
            send_interval,
            max_throttle_retries: None,
        }
    }

    /// Drop a notification once it has been throttled more than `max` times.
    /// `None` retries forever.
    pub fn with_max_throttle_retries(mut self, max: Option<u32>) -> Self {
        self.max_throttle_retries = max;
        self
    }

    /// Run until the process exits. The worker keeps its own producer
    /// handle for requeueing, so the channel never closes underneath it.
    pub async fn run(mut self) {
        info!(
            "Delivery worker started (send interval: {:?})",
            self.send_interval
        );

        while let Some(notification) = self.rx.recv().await {
            self.deliver(notification).await;
            tokio::time::sleep(self.send_interval).await;
        }
    }

    /// Deliver everything currently queued, including anything requeued
    /// along the way, then return the number of attempts made.
    pub async fn drain(&mut self) -> usize {
        let mut attempts = 0;
        while let Ok(notification) = self.rx.try_recv() {
            self.deliver(notification).await;
            attempts += 1;
            tokio::time::sleep(self.send_interval).await;
        }
        attempts
    }

    async fn deliver(&self, mut notification: Notification) {
        match self.sink.notify(&notification.message()).await {
            DeliveryOutcome::Delivered => {
                info!("Sent: {}", notification.title);
            }
            DeliveryOutcome::Throttled { retry_after } => {
                notification.throttled += 1;
                if let Some(max) = self.max_throttle_retries {
                    if notification.throttled > max {
                        error!(
                            "Dropping {} after {} throttled attempts",
                            notification.title,
                            notification.throttle_count()
                        );
                        return;
                    }
                }

                warn!(
                    "Rate limited sending {}, waiting {:?}",
                    notification.title, retry_after
                );
                tokio::time::sleep(retry_after).await;

                let title = notification.title.clone();
                if let Err(e) = self.requeue.enqueue(notification) {
                    error!("Failed to requeue {}: {}", title, e);
                }
            }
            DeliveryOutcome::Failed(reason) => {
                error!("Failed to send {}: {}", notification.title, reason);
            }
        }
    }
}
