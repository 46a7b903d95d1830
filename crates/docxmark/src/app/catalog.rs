//! Template catalog: which source documents are staged under which names.

use serde::Serialize;

use crate::infra::config::{Config, TemplateEntry};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    entries: Vec<TemplateEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<TemplateEntry>) -> Self {
        Self { entries }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.templates.clone())
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by source file name, ignoring ASCII case.
    pub fn by_source(&self, source: &str) -> Option<&TemplateEntry> {
        self.entries
            .iter()
            .find(|entry| entry.source.eq_ignore_ascii_case(source))
    }
}
