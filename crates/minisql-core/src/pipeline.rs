// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! One-call driver for the three analysis phases.
//!
//! Each phase always runs: lexical errors never stop parsing and syntax
//! errors never stop semantic analysis of the statements that did parse.

use crate::ast::Statement;
use crate::semantic_analysis::{AnalysisResult, analyse};
use crate::source_analysis::{Diagnostic, Token, parse, tokenize};

/// Everything produced by checking one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutput {
    /// Tokens, ending with `Eof`.
    pub tokens: Vec<Token>,
    /// Statements that parsed, in source order.
    pub statements: Vec<Statement>,
    /// Semantic analysis of `statements`.
    pub analysis: AnalysisResult,
    lexical: Vec<Diagnostic>,
    syntax: Vec<Diagnostic>,
}

impl CheckOutput {
    /// All diagnostics: lexical, then syntax, then semantic, each in the order
    /// its phase found them.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lexical
            .iter()
            .chain(&self.syntax)
            .chain(&self.analysis.diagnostics)
    }

    /// Returns `true` if any diagnostic is an error. Warnings are ignored.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics().any(Diagnostic::is_error)
    }

    /// Returns `true` if any diagnostic is a warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.diagnostics().any(|d| !d.is_error())
    }
}

/// Lexes, parses and analyses `source`.
///
/// # Examples
///
/// ```
/// use minisql_core::pipeline::check_source;
/// use minisql_core::source_analysis::DiagnosticKind;
///
/// let output = check_source("CREATE TABLE t (a INT); @ SELECT b FROM t;");
/// let kinds: Vec<_> = output.diagnostics().map(|d| d.kind()).collect();
/// assert_eq!(
///     kinds,
///     vec![DiagnosticKind::Lexical, DiagnosticKind::Semantic]
/// );
/// assert!(output.has_errors());
/// ```
#[must_use]
pub fn check_source(source: &str) -> CheckOutput {
    let (tokens, lexical) = tokenize(source);
    let (statements, syntax) = parse(tokens.clone());
    let analysis = analyse(&statements);
    tracing::debug!(
        tokens = tokens.len(),
        statements = statements.len(),
        lexical = lexical.len(),
        syntax = syntax.len(),
        semantic = analysis.diagnostics.len(),
        "checked source"
    );
    CheckOutput {
        tokens,
        statements,
        analysis,
        lexical,
        syntax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{DiagnosticKind, Severity};

    #[test]
    fn clean_program() {
        let output = check_source(
            "CREATE TABLE t (a INT);\nINSERT INTO t VALUES (1);\nSELECT a FROM t WHERE a > 0;",
        );
        assert_eq!(output.diagnostics().count(), 0);
        assert!(!output.has_errors());
        assert_eq!(output.statements.len(), 3);
        assert!(output.tokens.last().is_some_and(|t| t.kind().is_eof()));
    }

    #[test]
    fn diagnostics_are_grouped_by_phase() {
        // Semantic first in the source, lexical last.
        let output = check_source("SELECT * FROM ghosts;\nDELETE t;\n$");
        let kinds: Vec<_> = output.diagnostics().map(Diagnostic::kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::Lexical,
                DiagnosticKind::Syntax,
                DiagnosticKind::Semantic,
            ]
        );
    }

    #[test]
    fn warnings_are_not_errors() {
        let output = check_source(
            "CREATE TABLE t (a INT);\nCREATE USER u IDENTIFIED BY 'p';\n\
             GRANT SELECT ON t TO u;\nGRANT SELECT ON t TO u;",
        );
        let severities: Vec<_> = output.diagnostics().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::Warning]);
        assert!(!output.has_errors());
        assert!(output.has_warnings());
    }
}
