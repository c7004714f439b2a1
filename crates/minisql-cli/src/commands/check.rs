// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `minisql check`: run all analysis phases on minisql source files.
//!
//! Each file is lexed, parsed and analysed on its own (there is no shared
//! symbol table between files). Diagnostics are printed as miette reports on
//! stderr, or as one JSON object per line on stdout with `--format json`.
//! The command fails if any error is reported, or any warning with
//! `--deny-warnings`.

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use minisql_core::pipeline::{CheckOutput, check_source};
use minisql_core::source_analysis::{Diagnostic, Severity};
use minisql_core::unparse::render_tree;
use serde::Deserialize;
use std::io::{self, Write};
use tracing::{debug, info, instrument, warn};

use super::config::{CheckConfig, find_config};
use super::sources::{find_source_files, project_root};
use super::tokens::write_token_listing;
use crate::diagnostic::CheckDiagnostic;

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output via miette (default).
    #[default]
    Text,
    /// Machine-readable JSON (one object per line).
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{other}': expected 'text' or 'json'"
            )),
        }
    }
}

/// Options given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckFlags {
    pub format: Option<OutputFormat>,
    pub show_tokens: bool,
    pub show_tree: bool,
    pub deny_warnings: bool,
}

/// Effective settings after merging `minisql.toml` with the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckSettings {
    pub format: OutputFormat,
    pub show_tokens: bool,
    pub show_tree: bool,
    pub deny_warnings: bool,
}

impl CheckSettings {
    /// A flag that is set wins over the config file; an unset flag falls back
    /// to the file, then to the default.
    pub fn resolve(config: Option<&CheckConfig>, flags: CheckFlags) -> Self {
        let from_file = |get: fn(&CheckConfig) -> Option<bool>| {
            config.and_then(get).unwrap_or(false)
        };
        Self {
            format: flags
                .format
                .or_else(|| config.and_then(|c| c.format))
                .unwrap_or_default(),
            show_tokens: flags.show_tokens || from_file(|c| c.show_tokens),
            show_tree: flags.show_tree || from_file(|c| c.show_tree),
            deny_warnings: flags.deny_warnings || from_file(|c| c.deny_warnings),
        }
    }
}

/// Diagnostic counts across all checked files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckSummary {
    fn record(&mut self, output: &CheckOutput) {
        self.files += 1;
        for diagnostic in output.diagnostics() {
            match diagnostic.severity {
                Severity::Error => self.errors += 1,
                Severity::Warning => self.warnings += 1,
            }
        }
    }

    /// Turns the counts into the command's result.
    fn into_result(self, deny_warnings: bool) -> Result<()> {
        let files = self.files;
        if self.errors > 0 {
            let errors = self.errors;
            let plural = if errors == 1 { "" } else { "s" };
            miette::bail!("{errors} error{plural} found in {files} file(s)");
        }
        if deny_warnings && self.warnings > 0 {
            let warnings = self.warnings;
            let plural = if warnings == 1 { "" } else { "s" };
            miette::bail!(
                "{warnings} warning{plural} found in {files} file(s) (warnings denied)"
            );
        }
        Ok(())
    }
}

/// Check the given path (file or directory).
#[instrument(skip_all, fields(path = %path))]
pub fn run_check(path: &str, flags: CheckFlags) -> Result<()> {
    info!("Starting check");
    let source_path = Utf8PathBuf::from(path);
    let source_files = find_source_files(&source_path)?;

    if source_files.is_empty() {
        miette::bail!("No .sql source files found in '{path}'");
    }
    info!(count = source_files.len(), "Found source files");

    let config = find_config(&project_root(&source_path))?;
    if config.is_none() {
        debug!("No minisql.toml found, using defaults");
    }
    let settings = CheckSettings::resolve(config.as_ref().map(|c| &c.check), flags);
    debug!(?settings, "Resolved check settings");

    let summary = check_files(
        &source_files,
        source_path.is_dir(),
        settings,
        &mut io::stdout().lock(),
    )?;
    info!(
        files = summary.files,
        errors = summary.errors,
        warnings = summary.warnings,
        "Check finished"
    );
    summary.into_result(settings.deny_warnings)
}

/// Check each file, writing listings, trees and JSON diagnostics to `out`.
///
/// In directory mode an unreadable file is skipped with a warning; otherwise
/// it is an error.
fn check_files(
    files: &[Utf8PathBuf],
    directory_mode: bool,
    settings: CheckSettings,
    out: &mut impl Write,
) -> Result<CheckSummary> {
    let mut summary = CheckSummary::default();
    for file in files {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) if directory_mode => {
                warn!(file = %file, error = %e, "Skipping unreadable file");
                continue;
            }
            Err(e) => {
                return Err(e)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to read '{file}'"));
            }
        };

        let output = check_source(&source);
        debug!(
            file = %file,
            statements = output.statements.len(),
            "Checked file"
        );
        report_file(file, &source, &output, settings, out).into_diagnostic()?;
        summary.record(&output);
    }
    Ok(summary)
}

fn report_file(
    file: &Utf8Path,
    source: &str,
    output: &CheckOutput,
    settings: CheckSettings,
    out: &mut impl Write,
) -> io::Result<()> {
    if settings.show_tokens {
        writeln!(out, "== tokens: {file}")?;
        write_token_listing(out, &output.tokens)?;
    }
    if settings.show_tree {
        for statement in &output.statements {
            writeln!(out, "== tree: {file}:{}", statement.position())?;
            write!(out, "{}", render_tree(statement))?;
        }
    }

    for diagnostic in output.diagnostics() {
        match settings.format {
            OutputFormat::Text => {
                let report =
                    CheckDiagnostic::from_core_diagnostic(diagnostic, file.as_str(), source);
                eprintln!("{:?}", miette::Report::new(report));
            }
            OutputFormat::Json => {
                writeln!(out, "{}", json_diagnostic(file, diagnostic))?;
            }
        }
    }
    Ok(())
}

/// One diagnostic as a JSON object.
fn json_diagnostic(file: &Utf8Path, diagnostic: &Diagnostic) -> serde_json::Value {
    let severity = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    serde_json::json!({
        "file": file.as_str(),
        "kind": diagnostic.kind().as_str(),
        "code": diagnostic.code.as_str(),
        "severity": severity,
        "message": diagnostic.message.as_str(),
        "line": diagnostic.position.line,
        "column": diagnostic.position.column,
        "span_start": diagnostic.span.start(),
        "span_end": diagnostic.span.end(),
        "hint": diagnostic.hint.as_deref(),
    })
}
