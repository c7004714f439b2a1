// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rich diagnostic rendering using miette.
//!
//! Converts minisql-core diagnostics into miette reports with the source
//! snippet, an arrow at the offending text, the phase as the diagnostic code
//! and the hint (if any) as help text.

use std::fmt::Display;

use miette::{Diagnostic, LabeledSpan, SourceCode, SourceSpan};
use minisql_core::source_analysis::{Diagnostic as CoreDiagnostic, Severity};

/// A checked-file diagnostic with rich formatting.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CheckDiagnostic {
    /// Phase and code, e.g. `syntax::unexpected-token`
    pub code: String,
    /// Error or warning
    pub severity: miette::Severity,
    /// Human-readable message, prefixed with the position
    pub message: String,
    /// Source code for context
    pub src: miette::NamedSource<String>,
    /// Location of the problem
    pub span: SourceSpan,
    /// Label for the span
    pub label: String,
    pub hint: Option<String>,
}

// Code and severity vary per diagnostic, so this is written out rather than
// derived.
impl Diagnostic for CheckDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.hint
            .as_ref()
            .map(|hint| Box::new(hint) as Box<dyn Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label.clone()),
            self.span,
        ))))
    }
}

impl CheckDiagnostic {
    /// Create a new diagnostic from a minisql-core diagnostic.
    pub fn from_core_diagnostic(
        diagnostic: &CoreDiagnostic,
        source_path: &str,
        source: &str,
    ) -> Self {
        let (severity, label) = match diagnostic.severity {
            Severity::Error => (miette::Severity::Error, "error here"),
            Severity::Warning => (miette::Severity::Warning, "warning here"),
        };

        Self {
            code: format!("{}::{}", diagnostic.kind(), diagnostic.code.as_str()),
            severity,
            message: format!(
                "{}:{}: {}",
                source_path, diagnostic.position, diagnostic.message
            ),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: diagnostic.span.into(),
            label: label.to_string(),
            hint: diagnostic.hint.as_ref().map(ToString::to_string),
        }
    }
}
