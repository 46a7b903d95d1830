//! Human-readable and JSON rendering of extraction and staging results.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use minijinja::Environment;
use serde::{Deserialize, Serialize};

use crate::app::extract::{ScanEntry, TemplateAnalysis};
use crate::app::request::{BatchResponse, GenerationOutcome, KeyCoverage};
use crate::app::stage::{DocumentStatus, StageReport};
use crate::domain::errors::ErrorKind;
use crate::domain::model::TemplateRecord;

const MAX_EXAMPLES: usize = 5;
const MAX_EXAMPLE_CHARS: usize = 60;

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Aligned plain text for terminals.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Renders reports through built-in templates.
pub struct Reporter {
    env: Environment<'static>,
}

impl Reporter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
        })
    }

    pub fn render_scan(&self, entries: &[ScanEntry], format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => {
                let rows: Vec<JsonScanRow<'_>> = entries.iter().map(JsonScanRow::from).collect();
                serde_json::to_string_pretty(&rows).context("failed to serialize scan report")
            }
            ReportFormat::Text => {
                let documents: Vec<TemplateDocument> = entries
                    .iter()
                    .map(|entry| match &entry.result {
                        Ok(analysis) => TemplateDocument::staged(
                            &entry.path,
                            None,
                            analysis.placeholders.sorted(),
                        ),
                        Err(err) => TemplateDocument::failed(&entry.path, None, err.to_string()),
                    })
                    .collect();
                let failed = entries.iter().filter(|entry| entry.is_failure()).count();
                let context = SummaryContext {
                    heading: format!("Scanned {} document(s)", entries.len()),
                    documents,
                    totals: format!("{} analyzed, {} failed", entries.len() - failed, failed),
                };
                self.render("summary", &context)
            }
        }
    }

    pub fn render_stage(&self, report: &StageReport, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => {
                let json = JsonStageReport {
                    report,
                    records: report.records(),
                };
                serde_json::to_string_pretty(&json).context("failed to serialize stage report")
            }
            ReportFormat::Text => {
                let documents = report
                    .documents
                    .iter()
                    .map(|doc| {
                        let target = Some(doc.target.as_path());
                        match &doc.status {
                            DocumentStatus::Staged { placeholders } => {
                                TemplateDocument::staged(&doc.source, target, placeholders.sorted())
                            }
                            DocumentStatus::SourceMissing => TemplateDocument::missing(&doc.source),
                            DocumentStatus::CopyFailed { reason } => TemplateDocument::failed(
                                &doc.source,
                                target,
                                format!("copy failed: {reason}"),
                            ),
                            DocumentStatus::ExtractionFailed { kind, reason } => {
                                TemplateDocument::failed(
                                    &doc.source,
                                    target,
                                    format!("{kind}: {reason}"),
                                )
                            }
                        }
                    })
                    .collect();
                let context = SummaryContext {
                    heading: format!("Staging templates into {}", report.template_dir.display()),
                    documents,
                    totals: format!(
                        "{} staged, {} failed, {} missing",
                        report.staged(),
                        report.failed(),
                        report.missing()
                    ),
                };
                self.render("summary", &context)
            }
        }
    }

    pub fn render_coverage(
        &self,
        path: &Path,
        coverage: &KeyCoverage,
        format: ReportFormat,
    ) -> Result<String> {
        match format {
            ReportFormat::Json => {
                serde_json::to_string_pretty(coverage).context("failed to serialize key coverage")
            }
            ReportFormat::Text => {
                let context = CoverageContext {
                    document: path.display().to_string(),
                    coverage,
                };
                self.render("coverage", &context)
            }
        }
    }

    pub fn render_results(&self, response: &BatchResponse, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => {
                serde_json::to_string_pretty(response).context("failed to serialize batch response")
            }
            ReportFormat::Text => {
                let results = response
                    .results
                    .iter()
                    .map(|outcome| match outcome {
                        GenerationOutcome::Success {
                            template_id,
                            success,
                            filename,
                            download_url,
                        } if *success => ResultLine {
                            ok: true,
                            template_id: template_id.clone(),
                            detail: format!("{filename} ({download_url})"),
                        },
                        GenerationOutcome::Success { template_id, .. } => ResultLine {
                            ok: false,
                            template_id: template_id.clone(),
                            detail: "service reported no success".into(),
                        },
                        GenerationOutcome::Failure { template_id, error } => ResultLine {
                            ok: false,
                            template_id: template_id.clone(),
                            detail: error.clone(),
                        },
                    })
                    .collect();
                let context = ResultsContext {
                    results,
                    succeeded: response.succeeded(),
                    total: response.results.len(),
                };
                self.render("results", &context)
            }
        }
    }

    fn render<S: Serialize>(&self, name: &str, context: &S) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(context))
            .map_err(|err| anyhow!("failed to render template '{name}': {err}"))
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("summary", SUMMARY_TEMPLATE)
        .map_err(|err| anyhow!("failed to register summary template: {err}"))?;
    env.add_template("coverage", COVERAGE_TEMPLATE)
        .map_err(|err| anyhow!("failed to register coverage template: {err}"))?;
    env.add_template("results", RESULTS_TEMPLATE)
        .map_err(|err| anyhow!("failed to register results template: {err}"))?;
    Ok(env)
}

/// Up to five sorted examples, each cut to sixty characters.
pub fn examples(sorted: &[&str]) -> Vec<String> {
    sorted
        .iter()
        .take(MAX_EXAMPLES)
        .map(|token| {
            if token.chars().count() > MAX_EXAMPLE_CHARS {
                let head: String = token.chars().take(MAX_EXAMPLE_CHARS).collect();
                format!("{head}...")
            } else {
                (*token).to_owned()
            }
        })
        .collect()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn document_label(source: &Path, target: Option<&Path>) -> String {
    match target {
        Some(target) => format!("{} -> {}", file_label(source), file_label(target)),
        None => file_label(source),
    }
}

#[derive(Serialize)]
struct SummaryContext {
    heading: String,
    documents: Vec<TemplateDocument>,
    totals: String,
}

#[derive(Serialize)]
struct TemplateDocument {
    status: &'static str,
    label: String,
    count: usize,
    examples: Vec<String>,
    error: Option<String>,
}

impl TemplateDocument {
    fn staged(source: &Path, target: Option<&Path>, sorted: Vec<&str>) -> Self {
        Self {
            status: "ok",
            label: document_label(source, target),
            count: sorted.len(),
            examples: examples(&sorted),
            error: None,
        }
    }

    fn missing(source: &Path) -> Self {
        Self {
            status: "missing",
            label: file_label(source),
            count: 0,
            examples: Vec::new(),
            error: None,
        }
    }

    fn failed(source: &Path, target: Option<&Path>, error: String) -> Self {
        Self {
            status: "failed",
            label: document_label(source, target),
            count: 0,
            examples: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Serialize)]
struct CoverageContext<'a> {
    document: String,
    coverage: &'a KeyCoverage,
}

#[derive(Serialize)]
struct ResultsContext {
    results: Vec<ResultLine>,
    succeeded: usize,
    total: usize,
}

#[derive(Serialize)]
struct ResultLine {
    ok: bool,
    template_id: String,
    detail: String,
}

#[derive(Serialize)]
struct JsonStageReport<'a> {
    #[serde(flatten)]
    report: &'a StageReport,
    records: Vec<TemplateRecord>,
}

#[derive(Serialize)]
struct JsonScanRow<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a TemplateAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Serialize)]
struct JsonError {
    kind: ErrorKind,
    message: String,
}

impl<'a> From<&'a ScanEntry> for JsonScanRow<'a> {
    fn from(entry: &'a ScanEntry) -> Self {
        match &entry.result {
            Ok(analysis) => Self {
                path: &entry.path,
                analysis: Some(analysis),
                error: None,
            },
            Err(err) => Self {
                path: &entry.path,
                analysis: None,
                error: Some(JsonError {
                    kind: err.kind(),
                    message: err.to_string(),
                }),
            },
        }
    }
}

const SUMMARY_TEMPLATE: &str = r#"{{ heading }}

{% for doc in documents %}
{% if doc.status == "ok" %}
[ok] {{ doc.label }}
     {{ doc.count }} unique placeholder(s)
{% for example in doc.examples %}
       - {{ example }}
{% endfor %}
{% elif doc.status == "missing" %}
[missing] {{ doc.label }} not found
{% else %}
[failed] {{ doc.label }}
     {{ doc.error }}
{% endif %}
{% endfor %}

{{ totals }}
"#;

const COVERAGE_TEMPLATE: &str = r#"Key coverage for {{ document }}
{% for key in coverage.matched %}
  [ok]      {{ key }}
{% endfor %}
{% for key in coverage.missing %}
  [missing] {{ key }}
{% endfor %}
{% for key in coverage.unused %}
  [unused]  {{ key }}
{% endfor %}
{{ coverage.matched | length }} matched, {{ coverage.missing | length }} missing, {{ coverage.unused | length }} unused
"#;

const RESULTS_TEMPLATE: &str = r#"{% for result in results %}
{% if result.ok %}[ok]{% else %}[failed]{% endif %} {{ result.template_id }}: {{ result.detail }}
{% endfor %}
{{ succeeded }}/{{ total }} generated
"#;
