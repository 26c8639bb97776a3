use serde::{Deserialize, Serialize};

use crate::domain::Entry;

pub const NO_TITLE: &str = "No Title";
pub const NO_LINK: &str = "No Link";

/// A pending announcement of one new entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub link: String,
    /// Number of times the sink has throttled this notification.
    #[serde(skip)]
    pub(crate) throttled: u32,
}

impl Notification {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            throttled: 0,
        }
    }

    pub fn from_entry(entry: &Entry) -> Self {
        let title = entry
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_TITLE);
        let link = entry
            .link
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(NO_LINK);
        Self::new(title, link)
    }

    /// Text posted to the sink.
    pub fn message(&self) -> String {
        format!("New entry found: {} - {}", self.title, self.link)
    }

    pub fn throttle_count(&self) -> u32 {
        self.throttled
    }
}
