use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::domain::SeenSet;
use crate::identity::IdentityKey;
use crate::store::SeenStore;

/// Flat-file seen-set: one identity key per line.
pub struct FileSeenStore {
    path: PathBuf,
}

impl FileSeenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "seen".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SeenStore for FileSeenStore {
    fn load(&self) -> Result<SeenSet> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No seen-set at {}, starting empty", self.path.display());
                return Ok(SeenSet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let seen: SeenSet = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(IdentityKey::from_raw)
            .collect();

        tracing::debug!("Loaded {} seen keys from {}", seen.len(), self.path.display());
        Ok(seen)
    }

    fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write beside the target and rename over it so a crash mid-write
        // leaves the previous file intact.
        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            let mut buf = String::with_capacity(seen.len() * 64);
            for key in seen.sorted() {
                buf.push_str(key.as_str());
                buf.push('\n');
            }
            file.write_all(buf.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        tracing::debug!("Saved {} seen keys to {}", seen.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn key(s: &str) -> IdentityKey {
        IdentityKey::from_raw(s)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeenStore::new(dir.path().join("seen_entries.txt"));
        let seen = assert_ok!(store.load());
        assert!(seen.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeenStore::new(dir.path().join("seen_entries.txt"));

        let seen: SeenSet = [key("https://a/feed::1"), key("https://a/feed::2")]
            .into_iter()
            .collect();
        assert_ok!(store.save(&seen));

        let loaded = assert_ok!(store.load());
        assert_eq!(loaded, seen);
    }

    #[test]
    fn test_file_format_is_one_key_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen_entries.txt");
        let store = FileSeenStore::new(&path);

        let seen: SeenSet = [key("u::b"), key("u::a")].into_iter().collect();
        store.save(&seen).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "u::a\nu::b\n");
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen_entries.txt");
        let store = FileSeenStore::new(&path);

        store.save(&[key("u::1")].into_iter().collect()).unwrap();
        store
            .save(&[key("u::1"), key("u::2")].into_iter().collect())
            .unwrap();

        assert_eq!(store.load().unwrap().len(), 2);
        assert!(!dir.path().join("seen_entries.txt.tmp").exists());
    }

    #[test]
    fn test_load_ignores_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen_entries.txt");
        fs::write(&path, "u::1\n\n  \nu::2\n").unwrap();

        let seen = FileSeenStore::new(&path).load().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&key("u::2")));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeenStore::new(dir.path().join("state").join("seen.txt"));
        store.save(&[key("u::1")].into_iter().collect()).unwrap();
        assert!(store.path().exists());
    }
}
