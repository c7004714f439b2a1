// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics shared by every phase.
//!
//! Phases never fail: each returns its diagnostics as ordinary data next to its
//! primary result. A [`Diagnostic`] records which phase produced it
//! ([`DiagnosticKind`]), what went wrong ([`DiagnosticCode`]) and where.

use ecow::EcoString;

use super::{Position, Span};

/// The phase that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Semantic,
}

impl DiagnosticKind {
    /// Returns the phase name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntax => "syntax",
            Self::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The specific problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // === Lexical ===
    IllegalCharacter,
    UnterminatedString,
    UnterminatedComment,

    // === Syntax ===
    UnexpectedToken,

    // === Semantic ===
    Redeclaration,
    DuplicateColumn,
    UndefinedTable,
    UndefinedColumn,
    UndefinedUser,
    ArityMismatch,
    TypeMismatch,
    /// The same privilege was granted twice (warning).
    DuplicateGrant,
}

impl DiagnosticCode {
    /// Returns the phase this code belongs to.
    #[must_use]
    pub const fn kind(self) -> DiagnosticKind {
        match self {
            Self::IllegalCharacter | Self::UnterminatedString | Self::UnterminatedComment => {
                DiagnosticKind::Lexical
            }
            Self::UnexpectedToken => DiagnosticKind::Syntax,
            Self::Redeclaration
            | Self::DuplicateColumn
            | Self::UndefinedTable
            | Self::UndefinedColumn
            | Self::UndefinedUser
            | Self::ArityMismatch
            | Self::TypeMismatch
            | Self::DuplicateGrant => DiagnosticKind::Semantic,
        }
    }

    /// Returns a stable kebab-case name, used by JSON output and miette codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IllegalCharacter => "illegal-character",
            Self::UnterminatedString => "unterminated-string",
            Self::UnterminatedComment => "unterminated-comment",
            Self::UnexpectedToken => "unexpected-token",
            Self::Redeclaration => "redeclaration",
            Self::DuplicateColumn => "duplicate-column",
            Self::UndefinedTable => "undefined-table",
            Self::UndefinedColumn => "undefined-column",
            Self::UndefinedUser => "undefined-user",
            Self::ArityMismatch => "arity-mismatch",
            Self::TypeMismatch => "type-mismatch",
            Self::DuplicateGrant => "duplicate-grant",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A defect in the input.
    Error,
    /// Suspicious but valid input.
    Warning,
}

/// A diagnostic message (error or warning).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub code: DiagnosticCode,
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The human-readable message.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Line and column of the start of `span`.
    pub position: Position,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(
        code: DiagnosticCode,
        message: impl Into<EcoString>,
        span: Span,
        position: Position,
    ) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            span,
            position,
            hint: None,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(
        code: DiagnosticCode,
        message: impl Into<EcoString>,
        span: Span,
        position: Position,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message, span, position)
        }
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Returns the phase that produced this diagnostic.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        self.code.kind()
    }

    /// Returns `true` for error-severity diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{} {level} at line {}, column {}: {}",
            self.kind(),
            self.position.line,
            self.position.column,
            self.message
        )
    }
}
