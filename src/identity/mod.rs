//! Entry identity derivation.
//!
//! Feeds are sloppy about metadata: GUIDs go missing, links carry tracking
//! parameters, some entries have nothing but a title. The resolver picks the
//! most stable field available:
//!
//! 1. the feed-supplied `id`
//! 2. the `link`, reduced to scheme, host and path
//! 3. `title` and `published` together
//!
//! The result is scoped to its feed by [`IdentityKey`].

use std::fmt;

use url::Url;

use crate::domain::{Entry, FeedSource};

const KEY_SEPARATOR: &str = "::";

/// Deduplication key for one entry of one feed: `<feed-source>::<entry-identity>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(source: &FeedSource, entry_identity: &str) -> Self {
        Self(format!("{}{}{}", source, KEY_SEPARATOR, entry_identity))
    }

    pub fn derive(source: &FeedSource, entry: &Entry) -> Self {
        Self::new(source, &resolve(entry))
    }

    /// Wrap a key read back from storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the entry-identity part of a key. Returns an empty string when
/// the entry carries no usable metadata at all.
pub fn resolve(entry: &Entry) -> String {
    if let Some(id) = non_empty(&entry.id) {
        return id.to_string();
    }

    if let Some(link) = non_empty(&entry.link) {
        return normalize_link(link);
    }

    let title = non_empty(&entry.title).unwrap_or_default();
    let published = non_empty(&entry.published).unwrap_or_default();
    if title.is_empty() && published.is_empty() {
        return String::new();
    }
    format!("{}|{}", title, published)
}

/// Strip query string and fragment so tracking parameters don't defeat
/// deduplication.
pub fn normalize_link(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) => match url.host_str() {
            Some(host) => match url.port() {
                Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
                None => format!("{}://{}{}", url.scheme(), host, url.path()),
            },
            None => format!("{}:{}", url.scheme(), url.path()),
        },
        Err(_) => {
            let end = link.find(['?', '#']).unwrap_or(link.len());
            link[..end].to_string()
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
