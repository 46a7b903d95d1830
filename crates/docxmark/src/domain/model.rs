//! Domain models for placeholder tokens and template records.

use std::collections::HashSet;
use std::collections::hash_set;
use std::path::PathBuf;

use serde::{Deserialize, Serialize, Serializer};

/// Unordered set of trimmed, non-empty placeholder tokens.
///
/// Serializes as a sorted array so repeated runs produce identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderSet(HashSet<String>);

impl PlaceholderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `raw` and insert it. Blank input is ignored.
    ///
    /// Returns `true` when the token was not already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let token = raw.trim();
        if token.is_empty() {
            return false;
        }
        self.0.insert(token.to_owned())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Tokens in lexical order, for display.
    pub fn sorted(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.0.iter().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}

impl Serialize for PlaceholderSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}

impl<'a> FromIterator<&'a str> for PlaceholderSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = PlaceholderSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl IntoIterator for PlaceholderSet {
    type Item = String;
    type IntoIter = hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlaceholderSet {
    type Item = &'a String;
    type IntoIter = hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Placeholders found in one source document, keyed to the template it was staged as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecord {
    pub source: PathBuf,
    pub template_id: String,
    pub target: PathBuf,
    pub placeholders: PlaceholderSet,
}
