/// A single `KEY=value` entry in an env file.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    pub line_number: usize,
}

/// Represents any line in an env file.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// A key-value variable entry.
    Entry(EnvEntry),
    /// A comment line (e.g. `# Database config`).
    Comment,
    /// An empty or whitespace-only line.
    Blank,
}

/// A parsed env file, line by line.
///
/// Keeps comments and blanks so diagnostics can point at the
/// original line numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvFile {
    pub lines: Vec<Line>,
}

impl EnvFile {
    /// Iterates over only the key-value entries, skipping comments and blanks.
    pub fn entries(&self) -> impl Iterator<Item = &EnvEntry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            _ => None,
        })
    }
}

#[cfg(test)]
impl EnvFile {
    /// Returns the value for the given key, if present.
    ///
    /// With duplicate keys the last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .filter(|e| e.key == key)
            .last()
            .map(|e| e.value.as_str())
    }

    /// Returns all keys in this file, in file order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries().map(|e| e.key.as_str()).collect()
    }
}
