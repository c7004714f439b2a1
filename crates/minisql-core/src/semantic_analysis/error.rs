// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis error types.

use ecow::EcoString;
use thiserror::Error;

use crate::ast::DataType;
use crate::source_analysis::{Diagnostic, DiagnosticCode, Position, Severity, Span};

/// A semantic problem discovered during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub span: Span,
    pub position: Position,
}

/// Types of semantic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    /// `CREATE TABLE` for a name already in use.
    #[error("table '{table}' is already declared")]
    TableRedeclared { table: EcoString },

    /// `CREATE USER` for a name already in use.
    #[error("user '{user}' is already declared")]
    UserRedeclared { user: EcoString },

    /// The same column name twice in one `CREATE TABLE`.
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: EcoString, column: EcoString },

    #[error("table '{table}' is not declared")]
    UndefinedTable { table: EcoString },

    #[error("column '{column}' does not exist in table '{table}'")]
    UndefinedColumn { table: EcoString, column: EcoString },

    #[error("user '{user}' is not declared")]
    UndefinedUser { user: EcoString },

    /// Number of `INSERT` values differs from the number of columns.
    #[error("table '{table}' has {expected} columns but {found} values were given")]
    ArityMismatch {
        table: EcoString,
        expected: usize,
        found: usize,
    },

    /// A value that cannot be stored in its column.
    #[error("column '{column}' is {expected} but the value is {found}")]
    ValueTypeMismatch {
        column: EcoString,
        expected: DataType,
        found: DataType,
    },

    /// A comparison between types that do not widen to each other.
    #[error("cannot compare {left} with {right}")]
    IncomparableTypes { left: DataType, right: DataType },

    /// A privilege granted again. Only a warning.
    #[error("user '{user}' already has {privilege} on '{table}'")]
    DuplicateGrant {
        privilege: EcoString,
        table: EcoString,
        user: EcoString,
    },
}

impl SemanticErrorKind {
    /// Returns the diagnostic code for this error.
    #[must_use]
    pub const fn code(&self) -> DiagnosticCode {
        match self {
            Self::TableRedeclared { .. } | Self::UserRedeclared { .. } => {
                DiagnosticCode::Redeclaration
            }
            Self::DuplicateColumn { .. } => DiagnosticCode::DuplicateColumn,
            Self::UndefinedTable { .. } => DiagnosticCode::UndefinedTable,
            Self::UndefinedColumn { .. } => DiagnosticCode::UndefinedColumn,
            Self::UndefinedUser { .. } => DiagnosticCode::UndefinedUser,
            Self::ArityMismatch { .. } => DiagnosticCode::ArityMismatch,
            Self::ValueTypeMismatch { .. } | Self::IncomparableTypes { .. } => {
                DiagnosticCode::TypeMismatch
            }
            Self::DuplicateGrant { .. } => DiagnosticCode::DuplicateGrant,
        }
    }

    /// Returns the severity: everything is an error except a repeated grant.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::DuplicateGrant { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UndefinedTable { .. } => {
                Some("declare the table with CREATE TABLE before using it")
            }
            Self::UndefinedUser { .. } => {
                Some("declare the user with CREATE USER before granting to it")
            }
            Self::ValueTypeMismatch {
                expected: DataType::Int,
                found: DataType::Float,
                ..
            } => Some("FLOAT values are not narrowed to INT"),
            _ => None,
        }
    }
}

impl SemanticError {
    /// Create a new semantic error.
    #[must_use]
    pub fn new(kind: SemanticErrorKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
        }
    }
}

impl From<SemanticError> for Diagnostic {
    fn from(err: SemanticError) -> Self {
        let code = err.kind.code();
        let message = err.kind.to_string();
        let mut diag = match err.kind.severity() {
            Severity::Error => Self::error(code, message, err.span, err.position),
            Severity::Warning => Self::warning(code, message, err.span, err.position),
        };
        if let Some(hint) = err.kind.hint() {
            diag = diag.with_hint(hint);
        }
        diag
    }
}
