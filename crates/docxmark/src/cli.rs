//! Command-line surface.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::catalog::Catalog;
use crate::app::extract::Extractor;
use crate::app::report::{ReportFormat, Reporter};
use crate::app::request::{self, BatchResponse, GenerationRequest, KeyCoverage};
use crate::app::stage::{StagePlan, Stager};
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "docxmark",
    author,
    version,
    about = "Find highlighted placeholders in Word templates and stage them for generation"
)]
pub struct Cli {
    /// Extra configuration file layered over the defaults.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract placeholders from one or more documents.
    Scan {
        #[arg(required = true, value_name = "DOCX")]
        documents: Vec<PathBuf>,
        /// Highlight color marking placeholders.
        #[arg(long)]
        marker_color: Option<String>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Copy catalogued templates into the template directory and analyze them.
    Stage {
        #[arg(long, value_name = "DIR")]
        upload_dir: Option<PathBuf>,
        #[arg(long, value_name = "DIR")]
        template_dir: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// List the template catalog.
    Templates {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Compare a document's placeholders with the keys of a client-data file.
    Check {
        #[arg(value_name = "DOCX")]
        document: PathBuf,
        /// JSON object mapping placeholder keys to replacement text.
        #[arg(long, value_name = "JSON")]
        data: PathBuf,
        /// Template id used in the emitted request. Defaults to the catalog id or file stem.
        #[arg(long)]
        template_id: Option<String>,
        /// Write a generation request for the service to this path.
        #[arg(long, value_name = "PATH")]
        emit_request: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Summarize a batch response returned by the generation service.
    Results {
        #[arg(value_name = "JSON")]
        response: PathBuf,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    if let Command::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "docxmark", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    let reporter = Reporter::new()?;

    match cli.command {
        Command::Scan {
            documents,
            marker_color,
            format,
        } => {
            if let Some(color) = marker_color {
                config.extract.marker_color = color;
            }
            let entries = Extractor::from_config(&config).analyze_all(&documents);
            emit(&reporter.render_scan(&entries, format)?)?;
            Ok(exit_code(entries.iter().all(|entry| !entry.is_failure())))
        }
        Command::Stage {
            upload_dir,
            template_dir,
            format,
        } => {
            if let Some(dir) = upload_dir {
                config.staging.upload_dir = dir;
            }
            if let Some(dir) = template_dir {
                config.staging.template_dir = dir;
            }
            let plan = StagePlan::from_config(&config);
            let report = Stager::new(Extractor::from_config(&config)).run(&plan)?;
            emit(&reporter.render_stage(&report, format)?)?;
            Ok(exit_code(report.failed() == 0))
        }
        Command::Templates { format } => {
            let catalog = Catalog::from_config(&config);
            let rendered = match format {
                ReportFormat::Json => serde_json::to_string_pretty(catalog.entries())
                    .context("failed to serialize template catalog")?,
                ReportFormat::Text => catalog
                    .entries()
                    .iter()
                    .map(|entry| {
                        format!(
                            "{:<20} {:<24} {} -> {}",
                            entry.id, entry.name, entry.source, entry.target
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            emit(&rendered)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            document,
            data,
            template_id,
            emit_request,
            format,
        } => {
            let placeholders = Extractor::from_config(&config)
                .extract_path(&document)
                .with_context(|| {
                    format!("failed to extract placeholders from {}", document.display())
                })?;
            let client_data = request::load_client_data(&data)?;
            let coverage = KeyCoverage::compute(&placeholders, &client_data);
            emit(&reporter.render_coverage(&document, &coverage, format)?)?;

            if let Some(path) = emit_request {
                let id = template_id.unwrap_or_else(|| {
                    default_template_id(&Catalog::from_config(&config), &document)
                });
                GenerationRequest::new(vec![id], client_data).write_to(&path)?;
                tracing::info!(path = %path.display(), "wrote generation request");
            }
            Ok(exit_code(coverage.is_complete()))
        }
        Command::Results { response, format } => {
            let response = BatchResponse::from_file(&response)?;
            emit(&reporter.render_results(&response, format)?)?;
            Ok(exit_code(response.failed() == 0))
        }
        Command::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn default_template_id(catalog: &Catalog, document: &Path) -> String {
    let file_name = document
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(entry) = catalog.by_source(&file_name) {
        return entry.id.clone();
    }
    document
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn emit(rendered: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write to stdout")
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_template_id_prefers_catalog() {
        let catalog = Catalog::from_config(&Config::defaults().unwrap());
        assert_eq!(
            default_template_id(&catalog, Path::new("/tmp/uploads/Annual_Update.docx")),
            "annual_update"
        );
        assert_eq!(
            default_template_id(&catalog, Path::new("Fee_Letter.docx")),
            "fee_letter"
        );
    }

    #[test]
    fn parses_scan_arguments() {
        let cli = Cli::parse_from([
            "docxmark",
            "-vv",
            "scan",
            "a.docx",
            "b.docx",
            "--marker-color",
            "cyan",
            "--format",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Scan {
                documents,
                marker_color,
                format,
            } => {
                assert_eq!(documents.len(), 2);
                assert_eq!(marker_color.as_deref(), Some("cyan"));
                assert_eq!(format, ReportFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
