use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::sink::{Sink, WebhookSink};
use crate::store::{FileSeenStore, SeenStore};

/// Every collaborator the relay needs, built from one [`Config`].
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub normalizer: Normalizer,
    pub store: Arc<dyn SeenStore + Send + Sync>,
    pub sink: Arc<dyn Sink + Send + Sync>,
    pub completion_sink: Arc<dyn Sink + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(
            config.feeds.request_timeout,
            &config.feeds.user_agent,
        )?);
        let store: Arc<dyn SeenStore + Send + Sync> =
            Arc::new(FileSeenStore::new(&config.feeds.seen_file));

        let delivery = &config.delivery;
        let sink: Arc<dyn Sink + Send + Sync> = Arc::new(WebhookSink::new(
            delivery.webhook_url.clone(),
            delivery.request_timeout,
            delivery.default_retry_after,
        )?);
        let completion_sink: Arc<dyn Sink + Send + Sync> = Arc::new(WebhookSink::new(
            delivery.completion_url(),
            delivery.request_timeout,
            delivery.default_retry_after,
        )?);

        Ok(Self {
            config,
            fetcher,
            normalizer: Normalizer::new(),
            store,
            sink,
            completion_sink,
        })
    }
}
