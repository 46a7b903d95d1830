//! Placeholder extraction from highlighted runs.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::domain::errors::ExtractError;
use crate::domain::markup::MarkupTree;
use crate::domain::model::PlaceholderSet;
use crate::infra::archive::{self, BODY_PART};
use crate::infra::config::Config;

/// Highlight value marking a run as a placeholder unless configured otherwise.
pub const DEFAULT_MARKER_COLOR: &str = "yellow";

/// Finds runs highlighted with the marker color and collects their text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    marker_color: String,
    body_part: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_COLOR)
    }
}

impl Extractor {
    pub fn new(marker_color: impl Into<String>) -> Self {
        Self {
            marker_color: marker_color.into(),
            body_part: BODY_PART.to_owned(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.extract.marker_color.clone()).with_body_part(&config.extract.body_part)
    }

    pub fn with_body_part(mut self, part: impl Into<String>) -> Self {
        self.body_part = part.into();
        self
    }

    pub fn marker_color(&self) -> &str {
        &self.marker_color
    }

    /// Extract placeholders from the body part of the container at `path`.
    pub fn extract_path(&self, path: &Path) -> Result<PlaceholderSet, ExtractError> {
        let xml = archive::read_part(path, &self.body_part)?;
        let placeholders = self.scan(&xml, Some(path))?;
        tracing::debug!(
            path = %path.display(),
            count = placeholders.len(),
            "extracted placeholders"
        );
        Ok(placeholders)
    }

    /// Extract placeholders from raw body markup.
    pub fn extract_xml(&self, xml: &str) -> Result<PlaceholderSet, ExtractError> {
        self.scan(xml, None)
    }

    /// Analyze the container at `path`, producing the per-template analysis record.
    pub fn analyze(&self, path: &Path) -> Result<TemplateAnalysis, ExtractError> {
        let placeholders = self.extract_path(path)?;
        Ok(TemplateAnalysis::new(path, placeholders))
    }

    /// Analyze independent documents in parallel, keeping input order.
    pub fn analyze_all(&self, paths: &[PathBuf]) -> Vec<ScanEntry> {
        paths
            .par_iter()
            .map(|path| {
                let result = self.analyze(path);
                if let Err(err) = &result {
                    tracing::warn!(
                        path = %path.display(),
                        kind = %err.kind(),
                        error = %err,
                        "extraction failed"
                    );
                }
                ScanEntry {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    }

    fn scan(&self, xml: &str, path: Option<&Path>) -> Result<PlaceholderSet, ExtractError> {
        let tree = MarkupTree::parse(xml).map_err(|source| ExtractError::MalformedMarkup {
            origin: path.map_or_else(
                || "document body".to_owned(),
                |path| path.display().to_string(),
            ),
            path: path.map(Path::to_path_buf),
            source,
        })?;

        let mut placeholders = PlaceholderSet::new();
        for run in tree.runs() {
            let Some(properties) = run.properties() else {
                continue;
            };
            if properties.highlight() != Some(self.marker_color.as_str()) {
                continue;
            }
            if let Some(text) = run.text() {
                placeholders.insert(text);
            }
        }
        Ok(placeholders)
    }
}

/// Result of extracting one document named by the caller.
#[derive(Debug)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub result: Result<TemplateAnalysis, ExtractError>,
}

impl ScanEntry {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Result of analyzing one template document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateAnalysis {
    pub path: PathBuf,
    pub placeholders: PlaceholderSet,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisMetadata {
    pub total_placeholders: usize,
    pub analyzed: bool,
}

impl TemplateAnalysis {
    pub fn new(path: &Path, placeholders: PlaceholderSet) -> Self {
        Self {
            path: path.to_path_buf(),
            metadata: AnalysisMetadata {
                total_placeholders: placeholders.len(),
                analyzed: true,
            },
            placeholders,
        }
    }
}
