// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for minisql source text.
//!
//! This module converts source text into a stream of [`Token`]s in a single
//! left-to-right pass, tracking line and column as it goes.
//!
//! # Error Recovery
//!
//! The lexer never stops on bad input. An illegal character is reported and
//! skipped (exactly one character), so one run surfaces every illegal
//! character. Unterminated strings and block comments are reported at their
//! opening delimiter and consume the rest of the input.
//!
//! # Example
//!
//! ```
//! use minisql_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("SELECT * FROM t;").collect();
//! assert_eq!(tokens.len(), 5); // SELECT, *, FROM, t, ; (EOF excluded from iterator)
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use super::{
    Diagnostic, Keyword, LexError, Operator, Position, Punctuation, Span, Token, TokenKind,
};

/// A lexer that tokenizes minisql source text.
///
/// It implements [`Iterator`] for easy consumption; the iterator stops before
/// the end-of-input token. Lexical errors are buffered and can be drained with
/// [`Lexer::take_errors`].
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte offset in source.
    offset: usize,
    /// Current line (1-based).
    line: u32,
    /// Current column in characters (1-based).
    column: u32,
    /// Errors found so far.
    errors: Vec<LexError>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("offset", &self.offset)
            .field("position", &self.current_position())
            .field("remaining", &self.source.get(self.offset..).unwrap_or(""))
            .finish_non_exhaustive()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            offset: 0,
            line: 1,
            column: 1,
            errors: Vec::new(),
        }
    }

    /// Removes and returns the errors found so far.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks one character past the next one.
    fn peek_second(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character, updating line and column.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.offset = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte offset.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_offset(&self) -> u32 {
        self.offset as u32
    }

    /// Returns the current line and column.
    const fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Creates a span from start to current offset.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_offset())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                }
                Some('-') if self.peek_second() == Some('-') => {
                    self.advance_while(|c| c != '\n');
                }
                Some('#') if self.peek_second() == Some('#') => {
                    self.skip_block_comment();
                }
                _ => return,
            }
        }
    }

    /// Skips a `## ... ##` comment. The opening `##` has not been consumed.
    fn skip_block_comment(&mut self) {
        let start = self.current_offset();
        let position = self.current_position();
        self.advance();
        self.advance();
        loop {
            match self.advance() {
                Some('#') if self.peek_char() == Some('#') => {
                    self.advance();
                    return;
                }
                Some(_) => {}
                None => {
                    self.errors
                        .push(LexError::unterminated_comment(self.span_from(start), position));
                    return;
                }
            }
        }
    }

    /// Lexes the next token, returning `Eof` at the end of input.
    ///
    /// Calling this again after `Eof` keeps returning `Eof`.
    pub fn lex_token(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let start = self.current_offset();
            let position = self.current_position();

            let Some(c) = self.advance() else {
                return Token::new(TokenKind::Eof, "", self.span_from(start), position);
            };

            let kind = match c {
                '(' => TokenKind::Punctuation(Punctuation::LeftParen),
                ')' => TokenKind::Punctuation(Punctuation::RightParen),
                ',' => TokenKind::Punctuation(Punctuation::Comma),
                ';' => TokenKind::Punctuation(Punctuation::Semicolon),
                '*' => TokenKind::Operator(Operator::Star),
                '=' => TokenKind::Operator(Operator::Eq),
                '<' => match self.peek_char() {
                    Some('=') => {
                        self.advance();
                        TokenKind::Operator(Operator::LtEq)
                    }
                    Some('>') => {
                        self.advance();
                        TokenKind::Operator(Operator::LtGt)
                    }
                    _ => TokenKind::Operator(Operator::Lt),
                },
                '>' => {
                    if self.peek_char() == Some('=') {
                        self.advance();
                        TokenKind::Operator(Operator::GtEq)
                    } else {
                        TokenKind::Operator(Operator::Gt)
                    }
                }
                '!' if self.peek_char() == Some('=') => {
                    self.advance();
                    TokenKind::Operator(Operator::NotEq)
                }
                '\'' => match self.lex_string(start, position) {
                    Some(token) => return token,
                    None => continue,
                },
                c if c.is_ascii_digit() => self.lex_number(),
                c if c.is_alphabetic() => {
                    self.advance_while(|c| c.is_alphanumeric() || c == '_');
                    let text = self.text_for(self.span_from(start));
                    Keyword::lookup(text).map_or(TokenKind::Identifier, TokenKind::Keyword)
                }
                other => {
                    self.errors
                        .push(LexError::illegal_char(other, self.span_from(start), position));
                    continue;
                }
            };

            let span = self.span_from(start);
            return Token::new(kind, self.text_for(span), span, position);
        }
    }

    /// Lexes the rest of a number whose first digit has been consumed.
    fn lex_number(&mut self) -> TokenKind {
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek_char() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
            TokenKind::Float
        } else {
            TokenKind::Integer
        }
    }

    /// Lexes a string literal whose opening quote has been consumed.
    ///
    /// Returns `None` (after recording an error) if the string is unterminated.
    fn lex_string(&mut self, start: u32, position: Position) -> Option<Token> {
        let content_start = self.current_offset();
        self.advance_while(|c| c != '\'');
        let content = self.span_from(content_start);
        if self.advance().is_none() {
            self.errors
                .push(LexError::unterminated_string(self.span_from(start), position));
            return None;
        }
        Some(Token::new(
            TokenKind::String,
            self.text_for(content),
            self.span_from(start),
            position,
        ))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lex_token();
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Lexes source into tokens including the final `Eof`, plus any lexical errors.
#[must_use]
pub fn lex_with_eof(source: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token();
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    (tokens, lexer.take_errors())
}

/// Tokenizes source text into tokens (ending with `Eof`) and lexical diagnostics.
///
/// # Examples
///
/// ```
/// use minisql_core::source_analysis::{TokenKind, tokenize};
///
/// let (tokens, diagnostics) = tokenize("SELECT @ name FROM t;");
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(tokens.last().map(|t| t.kind()), Some(TokenKind::Eof));
/// ```
#[must_use]
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let (tokens, errors) = lex_with_eof(source);
    let diagnostics: Vec<Diagnostic> = errors.into_iter().map(Diagnostic::from).collect();
    tracing::trace!(
        tokens = tokens.len(),
        errors = diagnostics.len(),
        "tokenized source"
    );
    (tokens, diagnostics)
}
