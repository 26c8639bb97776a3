use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::Result;

/// URL of a single configured feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeedSource(String);

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the feed list file: one URL per line.
    ///
    /// Blank lines and `#` comments are skipped. Repeated URLs keep only
    /// their first position.
    pub fn read_list(path: &Path) -> Result<Vec<FeedSource>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse_list(&content))
    }

    pub fn parse_list(content: &str) -> Vec<FeedSource> {
        let mut seen = HashSet::new();
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|line| seen.insert(*line))
            .map(FeedSource::new)
            .collect()
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeedSource {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_skips_blank_lines() {
        let sources = FeedSource::parse_list(
            "https://a.example/feed.xml\n\n   \nhttps://b.example/rss\n",
        );
        assert_eq!(
            sources,
            vec![
                FeedSource::new("https://a.example/feed.xml"),
                FeedSource::new("https://b.example/rss"),
            ]
        );
    }

    #[test]
    fn test_parse_list_trims_and_dedups_in_order() {
        let sources = FeedSource::parse_list(
            "  https://b.example/rss  \n# disabled\nhttps://a.example/feed\nhttps://b.example/rss\n",
        );
        assert_eq!(
            sources,
            vec![
                FeedSource::new("https://b.example/rss"),
                FeedSource::new("https://a.example/feed"),
            ]
        );
    }

    #[test]
    fn test_read_list_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FeedSource::read_list(&dir.path().join("rss.txt")).is_err());
    }
}
