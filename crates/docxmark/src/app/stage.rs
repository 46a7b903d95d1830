//! Staging pass: copy catalogued sources into the template directory and analyze them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::app::catalog::Catalog;
use crate::app::extract::Extractor;
use crate::domain::errors::ErrorKind;
use crate::domain::model::{PlaceholderSet, TemplateRecord};
use crate::infra::config::{Config, TemplateEntry};

/// Inputs of one staging pass.
#[derive(Debug, Clone)]
pub struct StagePlan {
    pub upload_dir: PathBuf,
    pub template_dir: PathBuf,
    pub catalog: Catalog,
}

impl StagePlan {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upload_dir: config.staging.upload_dir.clone(),
            template_dir: config.staging.template_dir.clone(),
            catalog: Catalog::from_config(config),
        }
    }
}

/// What happened to one catalogued document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Staged { placeholders: PlaceholderSet },
    SourceMissing,
    CopyFailed { reason: String },
    /// The copy succeeded but the document could not be analyzed.
    ExtractionFailed { kind: ErrorKind, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub template_id: String,
    pub source: PathBuf,
    pub target: PathBuf,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

impl DocumentOutcome {
    pub fn placeholders(&self) -> Option<&PlaceholderSet> {
        match &self.status {
            DocumentStatus::Staged { placeholders } => Some(placeholders),
            _ => None,
        }
    }
}

/// Outcome of a full staging pass, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub template_dir: PathBuf,
    pub documents: Vec<DocumentOutcome>,
}

impl StageReport {
    pub fn staged(&self) -> usize {
        self.count(|status| matches!(status, DocumentStatus::Staged { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| {
            matches!(
                status,
                DocumentStatus::CopyFailed { .. } | DocumentStatus::ExtractionFailed { .. }
            )
        })
    }

    pub fn missing(&self) -> usize {
        self.count(|status| matches!(status, DocumentStatus::SourceMissing))
    }

    /// Template records for every successfully staged document.
    pub fn records(&self) -> Vec<TemplateRecord> {
        self.documents
            .iter()
            .filter_map(|doc| {
                doc.placeholders().map(|placeholders| TemplateRecord {
                    source: doc.source.clone(),
                    template_id: doc.template_id.clone(),
                    target: doc.target.clone(),
                    placeholders: placeholders.clone(),
                })
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&DocumentStatus) -> bool) -> usize {
        self.documents
            .iter()
            .filter(|doc| predicate(&doc.status))
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stager {
    extractor: Extractor,
}

impl Stager {
    pub fn new(extractor: Extractor) -> Self {
        Self { extractor }
    }

    /// Stage every catalogued document. One bad document never aborts the pass.
    pub fn run(&self, plan: &StagePlan) -> Result<StageReport> {
        fs::create_dir_all(&plan.template_dir).with_context(|| {
            format!(
                "failed to create template directory {}",
                plan.template_dir.display()
            )
        })?;

        let documents: Vec<DocumentOutcome> = plan
            .catalog
            .entries()
            .par_iter()
            .map(|entry| self.stage_one(plan, entry))
            .collect();

        let report = StageReport {
            template_dir: plan.template_dir.clone(),
            documents,
        };
        tracing::info!(
            staged = report.staged(),
            failed = report.failed(),
            missing = report.missing(),
            "staging pass complete"
        );
        Ok(report)
    }

    fn stage_one(&self, plan: &StagePlan, entry: &TemplateEntry) -> DocumentOutcome {
        let source = plan.upload_dir.join(&entry.source);
        let target = plan.template_dir.join(&entry.target);
        let status = self.stage_document(&source, &target);
        DocumentOutcome {
            template_id: entry.id.clone(),
            source,
            target,
            status,
        }
    }

    fn stage_document(&self, source: &Path, target: &Path) -> DocumentStatus {
        if !source.is_file() {
            tracing::warn!(path = %source.display(), "template source not found");
            return DocumentStatus::SourceMissing;
        }

        if let Err(err) = fs::copy(source, target) {
            tracing::warn!(
                path = %source.display(),
                target = %target.display(),
                error = %err,
                "failed to copy template"
            );
            return DocumentStatus::CopyFailed {
                reason: err.to_string(),
            };
        }
        tracing::info!(path = %source.display(), target = %target.display(), "copied template");

        match self.extractor.extract_path(source) {
            Ok(placeholders) => DocumentStatus::Staged { placeholders },
            Err(err) => {
                tracing::warn!(
                    path = %source.display(),
                    kind = %err.kind(),
                    error = %err,
                    "placeholder extraction failed"
                );
                DocumentStatus::ExtractionFailed {
                    kind: err.kind(),
                    reason: err.to_string(),
                }
            }
        }
    }
}
