use std::collections::HashMap;

use tracing::debug;

use crate::core::models::env_file::EnvFile;

/// Ordered key → value mapping with unique keys.
///
/// Keys keep the position of their first occurrence; a repeated key
/// takes the later value. Resolution overwrites values in place and
/// never adds or removes keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, or replace its value if already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(&idx) = self.index.get(&key) {
            self.entries[idx].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate entries with mutable access to the values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns entries sorted by key.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }
}

impl From<&EnvFile> for EnvMap {
    fn from(file: &EnvFile) -> Self {
        let mut map = EnvMap::new();
        for entry in file.entries() {
            if map.get(&entry.key).is_some() {
                debug!(
                    key = %entry.key,
                    line = entry.line_number,
                    "duplicate key, later value wins"
                );
            }
            map.insert(entry.key.clone(), entry.value.clone());
        }
        map
    }
}
