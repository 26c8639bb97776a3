use std::collections::HashSet;

use crate::identity::IdentityKey;

/// Identity keys that have already been reported. Never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    keys: HashSet<IdentityKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, key: IdentityKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in lexical order, for stable output.
    pub fn sorted(&self) -> Vec<&IdentityKey> {
        let mut keys: Vec<_> = self.keys.iter().collect();
        keys.sort();
        keys
    }
}

impl FromIterator<IdentityKey> for SeenSet {
    fn from_iter<I: IntoIterator<Item = IdentityKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}
