use feed_rs::model::Link;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{RelayError, Result};
use crate::domain::Entry;

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<Vec<Entry>> {
        // feed-rs invents an id for entries without one; keep it empty so
        // the identity fallbacks apply instead.
        let feed = parser::Builder::new()
            .id_generator(|_, _, _| String::new())
            .build()
            .parse(body)
            .map_err(|e| RelayError::FeedParse(e.to_string()))?;

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| Entry {
                id: Some(entry.id).filter(|id| !id.is_empty()),
                link: primary_link(&entry.links),
                title: entry
                    .title
                    .map(|t| decode_html_entities(&t.content).trim().to_string()),
                published: entry.published.or(entry.updated).map(|dt| dt.to_rfc3339()),
            })
            .collect();

        Ok(entries)
    }
}

/// The entry's `alternate` link (or one with no `rel`, which means the
/// same), else whatever comes first.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}
