// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing for minisql source text.
//!
//! This module contains the lexer, the parser and the diagnostic types every
//! phase shares.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each token
//! carries its byte [`Span`] and the 1-based [`Position`] of its first
//! character.
//!
//! ```
//! use minisql_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("DELETE FROM t;").collect();
//! assert_eq!(tokens.len(), 4); // DELETE, FROM, t, ;
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function converts tokens into [`Statement`](crate::ast::Statement)s
//! using recursive descent with panic-mode recovery (see the parser module for
//! the grammar).
//!
//! # Error Handling
//!
//! Neither phase fails. Lexical problems become [`LexError`]s and syntax
//! problems become [`ParseError`]s; both convert into the shared
//! [`Diagnostic`] type and are returned next to the tokens or statements.

mod diagnostic;
mod error;
mod lexer;
mod parser;
mod span;
mod token;


pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticKind, Severity};
pub use error::{Expected, LexError, LexErrorKind, ParseError};
pub use lexer::{Lexer, lex_with_eof, tokenize};
pub use parser::parse;
pub use span::{Position, Span};
pub use token::{Keyword, Operator, Punctuation, Token, TokenCategory, TokenKind};
