//! Short ID system for easier draft selection
//!
//! `stw list` numbers the drafts it prints (`PRP@1`, `PRP@2`, ...) and saves
//! the mapping so the next command can refer to a draft by that number.

use std::collections::HashMap;
use std::fs;

use crate::core::project::Project;

/// Index file location within a project
const INDEX_FILE: &str = ".stw/shortids.json";

/// Prefix shown in front of short IDs
pub const SHORT_PREFIX: &str = "PRP@";

/// A mapping of short IDs to full draft IDs
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ShortIdIndex {
    /// Maps short number to full draft ID string
    entries: HashMap<u32, String>,
    /// Maps full draft ID to short number (reverse lookup)
    #[serde(skip)]
    reverse: HashMap<String, u32>,
    /// Next available short ID
    next_id: u32,
}

impl ShortIdIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            reverse: HashMap::new(),
            next_id: 1,
        }
    }

    /// Load the index from a project, or create empty if not found
    pub fn load(project: &Project) -> Self {
        let path = project.root().join(INDEX_FILE);
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(mut index) = serde_json::from_str::<ShortIdIndex>(&content) {
                index.reverse = index.entries.iter().map(|(k, v)| (v.clone(), *k)).collect();
                return index;
            }
        }
        Self::new()
    }

    /// Save the index to a project
    pub fn save(&self, project: &Project) -> std::io::Result<()> {
        let path = project.root().join(INDEX_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    /// Clear and rebuild the index with new draft IDs
    pub fn rebuild(&mut self, ids: impl IntoIterator<Item = String>) {
        self.entries.clear();
        self.reverse.clear();
        self.next_id = 1;

        for id in ids {
            self.add(id);
        }
    }

    /// Add a draft ID and return its short ID
    pub fn add(&mut self, id: String) -> u32 {
        if let Some(&short_id) = self.reverse.get(&id) {
            return short_id;
        }

        let short_id = self.next_id;
        self.next_id += 1;
        self.entries.insert(short_id, id.clone());
        self.reverse.insert(id, short_id);
        short_id
    }

    /// Resolve a short ID reference to a full draft ID
    ///
    /// Accepts `PRP@N`, `@N`, or a plain number. Anything else is passed
    /// through unchanged for partial matching.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let upper = reference.to_uppercase();
        let num_str = if let Some(rest) = upper.strip_prefix(SHORT_PREFIX) {
            rest
        } else if let Some(rest) = upper.strip_prefix('@') {
            rest
        } else if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
            reference
        } else {
            return Some(reference.to_string());
        };

        num_str
            .parse::<u32>()
            .ok()
            .and_then(|n| self.entries.get(&n).cloned())
    }

    /// Get the short ID for a full draft ID
    pub fn get_short_id(&self, id: &str) -> Option<String> {
        self.reverse.get(id).map(|n| format!("{}{}", SHORT_PREFIX, n))
    }

    /// Number of entries in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
