use serde::{Deserialize, Serialize};

/// One parsed feed entry. Feeds in the wild omit any of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    /// Published (or, failing that, updated) timestamp as RFC 3339.
    pub published: Option<String>,
}

impl Entry {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}
