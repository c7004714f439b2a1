// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for minisql lexical analysis.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - The lexeme, the token's source text (string literals drop their quotes)
//! - A [`Span`] and a [`Position`] locating its first character
//!
//! Keywords, operators and punctuation carry a small sub-enum so the parser can
//! match on them directly instead of comparing strings.

use ecow::EcoString;

use super::{Position, Span};

/// A reserved word. Matching is exact and case-sensitive: `select` is an
/// identifier, only `SELECT` is the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Create,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Update,
    Set,
    Delete,
    User,
    Identified,
    By,
    Grant,
    On,
    To,
    And,
    Or,
    Not,
    Int,
    Float,
    Text,
}

impl Keyword {
    /// Every keyword, in the order they are documented.
    pub const ALL: [Self; 23] = [
        Self::Create,
        Self::Table,
        Self::Insert,
        Self::Into,
        Self::Values,
        Self::Select,
        Self::From,
        Self::Where,
        Self::Update,
        Self::Set,
        Self::Delete,
        Self::User,
        Self::Identified,
        Self::By,
        Self::Grant,
        Self::On,
        Self::To,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Int,
        Self::Float,
        Self::Text,
    ];

    /// Looks up a word in the keyword set. Case-sensitive.
    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kw| kw.as_str() == word)
    }

    /// Returns the keyword's source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Table => "TABLE",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::User => "USER",
            Self::Identified => "IDENTIFIED",
            Self::By => "BY",
            Self::Grant => "GRANT",
            Self::On => "ON",
            Self::To => "TO",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Text => "TEXT",
        }
    }

    /// Returns `true` if a statement can begin with this keyword.
    ///
    /// These are the synchronization points for parser error recovery.
    #[must_use]
    pub const fn starts_statement(self) -> bool {
        matches!(
            self,
            Self::Create | Self::Insert | Self::Select | Self::Update | Self::Delete | Self::Grant
        )
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comparison operator, or `*` (the select-list wildcard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<>`
    LtGt,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `*`
    Star,
}

impl Operator {
    /// Returns the operator's source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::LtGt => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Star => "*",
        }
    }

    /// Returns `true` for the seven comparison operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        !matches!(self, Self::Star)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Punctuation characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punctuation {
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
}

impl Punctuation {
    /// Returns the punctuation's source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
        }
    }
}

impl std::fmt::Display for Punctuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token, not including its text or location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A reserved word: `CREATE`, `WHERE`, `INT`, ...
    Keyword(Keyword),
    /// A user-chosen name: `students`, `first_name`
    Identifier,
    /// An integer literal: `42`
    Integer,
    /// A floating-point literal: `3.14`
    Float,
    /// A single-quoted string literal: `'Alice'`
    String,
    /// A comparison operator or `*`
    Operator(Operator),
    /// `(`, `)`, `,` or `;`
    Punctuation(Punctuation),
    /// End of input (synthetic, always the last token)
    Eof,
}

impl TokenKind {
    /// Returns the lexical category of this token.
    #[must_use]
    pub const fn category(self) -> TokenCategory {
        match self {
            Self::Keyword(_) => TokenCategory::Keyword,
            Self::Identifier => TokenCategory::Identifier,
            Self::Integer => TokenCategory::IntLiteral,
            Self::Float => TokenCategory::FloatLiteral,
            Self::String => TokenCategory::StringLiteral,
            Self::Operator(_) => TokenCategory::Operator,
            Self::Punctuation(_) => TokenCategory::Punctuation,
            Self::Eof => TokenCategory::EndOfInput,
        }
    }

    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::String)
    }

    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if a statement can begin with this token.
    #[must_use]
    pub const fn starts_statement(self) -> bool {
        match self {
            Self::Keyword(kw) => kw.starts_statement(),
            _ => false,
        }
    }
}

/// The closed set of lexical categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Operator,
    Punctuation,
    EndOfInput,
}

impl TokenCategory {
    /// Returns the upper-case name used in token listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "KEYWORD",
            Self::Identifier => "IDENTIFIER",
            Self::IntLiteral => "INT_LITERAL",
            Self::FloatLiteral => "FLOAT_LITERAL",
            Self::StringLiteral => "STRING_LITERAL",
            Self::Operator => "OPERATOR",
            Self::Punctuation => "PUNCTUATION",
            Self::EndOfInput => "EOF",
        }
    }
}

impl std::fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token with its text and source location.
///
/// Tokens are immutable once the lexer produces them.
///
/// # Examples
///
/// ```
/// use minisql_core::source_analysis::{Position, Span, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Identifier, "foo", Span::new(0, 3), Position::new(1, 1));
/// assert_eq!(token.lexeme(), "foo");
/// assert_eq!(token.span().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: EcoString,
    span: Span,
    position: Position,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<EcoString>,
        span: Span,
        position: Position,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            position,
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the token's text. String literals exclude their quotes.
    #[must_use]
    pub fn lexeme(&self) -> &EcoString {
        &self.lexeme
    }

    /// Returns the byte span of this token in the source.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the line and column of the token's first character.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Describes the token for error messages: `'students'`, `end of input`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::String => format!("string '{}'", self.lexeme),
            _ => format!("'{}'", self.lexeme),
        }
    }
}
