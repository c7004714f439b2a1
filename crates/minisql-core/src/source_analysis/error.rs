// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for lexical and syntactic analysis.
//!
//! Errors carry source locations ([`Span`] and [`Position`]). They convert into
//! the phase-independent [`Diagnostic`] that the pipeline reports.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use super::{Diagnostic, DiagnosticCode, Keyword, Position, Span, Token};

/// A lexical error encountered during tokenization.
///
/// The lexer recovers from every lexical error, so these never stop the
/// pipeline. They are collected and converted into [`Diagnostic`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
    /// Line and column of the offending character.
    pub position: Position,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: LexErrorKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
        }
    }

    /// Creates an "illegal character" error.
    #[must_use]
    pub fn illegal_char(c: char, span: Span, position: Position) -> Self {
        Self::new(LexErrorKind::IllegalCharacter(c), span, position)
    }

    /// Creates an "unterminated string" error.
    #[must_use]
    pub fn unterminated_string(span: Span, position: Position) -> Self {
        Self::new(LexErrorKind::UnterminatedString, span, position)
    }

    /// Creates an "unterminated comment" error.
    #[must_use]
    pub fn unterminated_comment(span: Span, position: Position) -> Self {
        Self::new(LexErrorKind::UnterminatedComment, span, position)
    }
}

impl From<LexError> for Diagnostic {
    fn from(err: LexError) -> Self {
        let code = match err.kind {
            LexErrorKind::IllegalCharacter(_) => DiagnosticCode::IllegalCharacter,
            LexErrorKind::UnterminatedString => DiagnosticCode::UnterminatedString,
            LexErrorKind::UnterminatedComment => DiagnosticCode::UnterminatedComment,
        };
        let diag = Self::error(code, err.kind.to_string(), err.span, err.position);
        match err.kind {
            LexErrorKind::UnterminatedString => diag.with_hint("close the string with '"),
            LexErrorKind::UnterminatedComment => diag.with_hint("close the comment with ##"),
            LexErrorKind::IllegalCharacter(_) => diag,
        }
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that cannot begin any token.
    #[error("illegal character '{0}'")]
    IllegalCharacter(char),

    /// A string literal was not terminated before end of input.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A `##` block comment was not terminated before end of input.
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// What the parser was looking for when it hit an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A specific keyword.
    Keyword(Keyword),
    /// `TABLE` or `USER` after `CREATE`.
    CreateTarget,
    /// A specific punctuation or operator spelling: `(`, `;`, `=`.
    Symbol(&'static str),
    /// A table or column name.
    Name(&'static str),
    /// `INT`, `FLOAT` or `TEXT`.
    DataType,
    /// An integer, float or string literal.
    Literal,
    /// A string literal.
    StringLiteral,
    /// A column name or a literal.
    Operand,
    /// One of the comparison operators.
    ComparisonOperator,
    /// A column list or `*`.
    SelectList,
    /// A privilege name.
    Privilege,
    /// The first token of a statement.
    Statement,
    /// A shallower condition.
    ShallowerNesting,
    /// A condition with fewer `AND`/`OR` operators.
    FewerConnectives,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword(kw) => write!(f, "{kw}"),
            Self::CreateTarget => f.write_str("TABLE or USER"),
            Self::Symbol(sym) => write!(f, "'{sym}'"),
            Self::Name(what) => write!(f, "{what} name"),
            Self::DataType => f.write_str("data type (INT, FLOAT or TEXT)"),
            Self::Literal => f.write_str("literal value"),
            Self::StringLiteral => f.write_str("string literal"),
            Self::Operand => f.write_str("column name or literal"),
            Self::ComparisonOperator => f.write_str("comparison operator"),
            Self::SelectList => f.write_str("column list or '*'"),
            Self::Privilege => f.write_str("privilege"),
            Self::Statement => {
                f.write_str("statement (CREATE, INSERT, SELECT, UPDATE, DELETE or GRANT)")
            }
            Self::ShallowerNesting => f.write_str("condition nested at most 64 levels deep"),
            Self::FewerConnectives => f.write_str("condition with at most 256 AND/OR operators"),
        }
    }
}

/// A syntax error: the parser expected one thing and found another.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ParseError {
    /// What the grammar required at this point.
    pub expected: Expected,
    /// Description of the token actually found.
    pub found: String,
    /// Location of the offending token.
    pub span: Span,
    /// Line and column of the offending token.
    pub position: Position,
}

impl ParseError {
    /// Creates an error for `token` where `expected` was required.
    #[must_use]
    pub fn unexpected(expected: Expected, token: &Token) -> Self {
        Self {
            expected,
            found: token.describe(),
            span: token.span(),
            position: token.position(),
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Self::error(
            DiagnosticCode::UnexpectedToken,
            err.to_string(),
            err.span,
            err.position,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{DiagnosticKind, TokenKind};

    #[test]
    fn lex_error_display() {
        let err = LexError::illegal_char('@', Span::new(0, 1), Position::new(1, 1));
        assert_eq!(err.to_string(), "illegal character '@'");

        let err = LexError::unterminated_string(Span::new(0, 10), Position::new(1, 1));
        assert_eq!(err.to_string(), "unterminated string literal");
    }

    #[test]
    fn lex_error_into_diagnostic() {
        let err = LexError::unterminated_comment(Span::new(5, 15), Position::new(2, 3));
        let diag = Diagnostic::from(err);
        assert_eq!(diag.code, DiagnosticCode::UnterminatedComment);
        assert_eq!(diag.kind(), DiagnosticKind::Lexical);
        assert_eq!(diag.position, Position::new(2, 3));
        assert!(diag.hint.is_some());
    }

    #[test]
    fn parse_error_message() {
        let token = Token::new(
            TokenKind::Identifier,
            "ghosts",
            Span::new(7, 13),
            Position::new(1, 8),
        );
        let err = ParseError::unexpected(Expected::Keyword(Keyword::From), &token);
        assert_eq!(err.to_string(), "expected FROM, found 'ghosts'");

        let diag = Diagnostic::from(err);
        assert_eq!(diag.kind(), DiagnosticKind::Syntax);
        assert_eq!(diag.span, Span::new(7, 13));
        assert_eq!(diag.position, Position::new(1, 8));
    }

    #[test]
    fn expected_symbol_and_name() {
        assert_eq!(Expected::Symbol(";").to_string(), "';'");
        assert_eq!(Expected::Name("table").to_string(), "table name");
    }
}
