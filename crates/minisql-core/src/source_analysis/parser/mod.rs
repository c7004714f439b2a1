// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for minisql.
//!
//! This parser builds [`Statement`]s from a stream of tokens, one grammar rule
//! per function and one token of lookahead. It never backtracks across a
//! consumed token.
//!
//! # Grammar
//!
//! ```text
//! program     ::= statement*
//! statement   ::= createTable | insert | select | update | delete | createUser | grant
//! createTable ::= CREATE TABLE ident '(' colDef (',' colDef)* ')' ';'
//! colDef      ::= ident (INT | FLOAT | TEXT)
//! insert      ::= INSERT INTO ident VALUES '(' literal (',' literal)* ')' ';'
//! select      ::= SELECT ('*' | ident (',' ident)*) FROM ident (WHERE condition)? ';'
//! update      ::= UPDATE ident SET assign (',' assign)* (WHERE condition)? ';'
//! assign      ::= ident '=' literal
//! delete      ::= DELETE FROM ident (WHERE condition)? ';'
//! createUser  ::= CREATE USER ident IDENTIFIED BY stringLiteral ';'
//! grant       ::= GRANT privilege ON ident TO ident ';'
//! privilege   ::= ident | SELECT | INSERT | UPDATE | DELETE
//! condition   ::= term (OR term)*
//! term        ::= factor (AND factor)*
//! factor      ::= NOT factor | comparison | '(' condition ')'
//! comparison  ::= operand compOp operand
//! operand     ::= ident | literal
//! ```
//!
//! # Error Recovery
//!
//! Recovery is panic mode, modelled as an explicit [`RecoveryMode`]:
//!
//! - **Scanning**: parse statements. The first mismatch inside a statement
//!   records exactly one syntax diagnostic at the offending token and switches
//!   to resyncing. The failed statement contributes no node.
//! - **Resyncing**: discard tokens until a `;` has been consumed or the current
//!   token can start a statement, then switch back to scanning.
//!
//! One malformed statement therefore never hides the statements after it, and
//! one run reports every independent syntax error.
//!
//! # Usage
//!
//! ```
//! use minisql_core::source_analysis::{parse, tokenize};
//!
//! let (tokens, _) = tokenize("CREATE TABLE t (a INT); SELECT * FROM t;");
//! let (statements, diagnostics) = parse(tokens);
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(statements.len(), 2);
//! ```

use crate::ast::{Identifier, Statement};
use crate::source_analysis::{
    Diagnostic, Expected, Keyword, ParseError, Position, Punctuation, Span, Token, TokenKind,
};

// Submodules with additional impl blocks for Parser
mod conditions;
mod statements;


/// Result of one grammar rule. The error is the first mismatch.
pub(super) type ParseResult<T> = Result<T, ParseError>;

/// Maximum nesting depth for `NOT` and parenthesised conditions.
///
/// Each level costs several stack frames; 64 is far beyond any realistic
/// `WHERE` clause and keeps fuzzed input from overflowing the stack.
const MAX_NESTING_DEPTH: usize = 64;

/// Maximum number of `AND`/`OR` operators in one condition.
///
/// Chains are left-deep trees, so this bounds the depth that analysis and
/// rendering recurse through together with [`MAX_NESTING_DEPTH`].
const MAX_CONNECTIVES: usize = 256;

/// Parses a token stream into statements and syntax diagnostics.
///
/// The token stream should end with an `Eof` token (as produced by
/// [`tokenize`](crate::source_analysis::tokenize)); a missing `Eof` is
/// tolerated.
#[must_use]
pub fn parse(tokens: Vec<Token>) -> (Vec<Statement>, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let statements = parser.parse_program();
    tracing::trace!(
        statements = statements.len(),
        errors = parser.diagnostics.len(),
        "parsed token stream"
    );
    (statements, parser.diagnostics)
}

/// The parser's recovery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RecoveryMode {
    /// Parsing statements normally.
    Scanning,
    /// Discarding tokens after a syntax error.
    Resyncing,
}

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed, always ending with `Eof`.
    pub(super) tokens: Vec<Token>,
    /// Current token index.
    pub(super) current: usize,
    /// Accumulated diagnostics.
    pub(super) diagnostics: Vec<Diagnostic>,
    /// Scanning or resyncing.
    pub(super) mode: RecoveryMode,
    /// Current condition nesting depth (guards against stack overflow).
    nesting_depth: usize,
    /// `AND`/`OR` operators seen in the current condition.
    connectives: usize,
}

impl Parser {
    /// Creates a new parser for the given tokens.
    fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.kind().is_eof()) {
            let (span, position) = tokens.last().map_or_else(
                || (Span::default(), Position::default()),
                |last| {
                    let end = last.span().end();
                    (Span::new(end, end), last.position())
                },
            );
            tokens.push(Token::new(TokenKind::Eof, "", span, position));
        }
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            mode: RecoveryMode::Scanning,
            nesting_depth: 0,
            connectives: 0,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    ///
    /// Never runs past the final `Eof`, which `new` guarantees is present.
    pub(super) fn current_token(&self) -> &Token {
        let index = self.current.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> TokenKind {
        self.current_token().kind()
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the consumed one.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Checks if the current token is exactly `kind`.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consumes the current token if it is exactly `kind`.
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be `kind`, advancing if it is.
    pub(super) fn expect(&mut self, kind: TokenKind, expected: Expected) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Expects a keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Token> {
        self.expect(TokenKind::Keyword(keyword), Expected::Keyword(keyword))
    }

    /// Expects a punctuation character.
    pub(super) fn expect_punctuation(&mut self, punct: Punctuation) -> ParseResult<Token> {
        self.expect(TokenKind::Punctuation(punct), Expected::Symbol(punct.as_str()))
    }

    /// Expects an identifier, describing it as `what` (`"table"`, `"column"`)
    /// in the error message.
    pub(super) fn expect_identifier(&mut self, what: &'static str) -> ParseResult<Identifier> {
        let token = self.expect(TokenKind::Identifier, Expected::Name(what))?;
        Ok(identifier_from(&token))
    }

    /// Builds an error for the current token.
    pub(super) fn unexpected(&self, expected: Expected) -> ParseError {
        ParseError::unexpected(expected, self.current_token())
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Increments the nesting depth, failing at the current token once it
    /// exceeds [`MAX_NESTING_DEPTH`]. Pair every `Ok` with [`Self::leave_nesting`].
    pub(super) fn enter_nesting(&mut self) -> ParseResult<()> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            return Err(self.unexpected(Expected::ShallowerNesting));
        }
        self.nesting_depth += 1;
        Ok(())
    }

    /// Counts one `AND`/`OR` at the current token, failing there once the
    /// condition has more than [`MAX_CONNECTIVES`].
    pub(super) fn count_connective(&mut self) -> ParseResult<()> {
        if self.connectives >= MAX_CONNECTIVES {
            return Err(self.unexpected(Expected::FewerConnectives));
        }
        self.connectives += 1;
        Ok(())
    }

    /// Starts counting connectives for a new condition.
    pub(super) fn reset_connectives(&mut self) {
        self.connectives = 0;
    }

    /// Decrements the nesting depth (pair with [`Self::enter_nesting`]).
    pub(super) fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    /// Records a syntax error and enters resync mode.
    fn fail(&mut self, err: ParseError) {
        tracing::debug!(
            position = %err.position,
            message = %err,
            "syntax error, resynchronizing"
        );
        self.diagnostics.push(err.into());
        self.nesting_depth = 0;
        self.connectives = 0;
        self.mode = RecoveryMode::Resyncing;
    }

    /// Takes one resync step.
    ///
    /// Stops (without consuming) at a token that starts a statement, consumes
    /// and stops at `;`, and otherwise discards the current token.
    fn resync_step(&mut self) {
        if self.at_recovery_point() {
            self.mode = RecoveryMode::Scanning;
            return;
        }
        let discarded = self.advance();
        if discarded.kind() == TokenKind::Punctuation(Punctuation::Semicolon) {
            self.mode = RecoveryMode::Scanning;
        }
    }

    /// Returns true if the current token can start a statement.
    fn at_recovery_point(&self) -> bool {
        self.current_kind().starts_statement()
    }

    // ========================================================================
    // Program Parsing
    // ========================================================================

    /// Parses statements until end of input.
    fn parse_program(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            match self.mode {
                RecoveryMode::Scanning => match self.parse_statement() {
                    Ok(statement) => statements.push(statement),
                    Err(err) => self.fail(err),
                },
                RecoveryMode::Resyncing => self.resync_step(),
            }
        }
        statements
    }
}

/// Converts an identifier or keyword token into an [`Identifier`] node.
pub(super) fn identifier_from(token: &Token) -> Identifier {
    Identifier::new(token.lexeme().clone(), token.span(), token.position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Condition, DataType, LiteralKind, Operand, SelectList};
    use crate::source_analysis::{DiagnosticCode, DiagnosticKind, tokenize};

    /// Helper to parse a string and check for errors.
    fn parse_ok(source: &str) -> Vec<Statement> {
        let (tokens, lex_diagnostics) = tokenize(source);
        assert!(lex_diagnostics.is_empty(), "lexical errors: {lex_diagnostics:?}");
        let (statements, diagnostics) = parse(tokens);
        assert!(diagnostics.is_empty(), "Expected no errors, got: {diagnostics:?}");
        statements
    }

    /// Helper to parse a string expecting errors.
    fn parse_err(source: &str) -> (Vec<Statement>, Vec<Diagnostic>) {
        let (tokens, _) = tokenize(source);
        parse(tokens)
    }

    fn single(source: &str) -> Statement {
        let mut statements = parse_ok(source);
        assert_eq!(statements.len(), 1);
        statements.remove(0)
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_ok("").is_empty());
        assert!(parse_ok("-- nothing here\n").is_empty());
    }

    #[test]
    fn parse_create_table() {
        let Statement::CreateTable(create) =
            single("CREATE TABLE students (id INT, name TEXT, gpa FLOAT);")
        else {
            panic!("expected CreateTable");
        };
        assert_eq!(create.table.name, "students");
        let columns: Vec<_> = create
            .columns
            .iter()
            .map(|c| (c.name.name.as_str(), c.data_type))
            .collect();
        assert_eq!(
            columns,
            vec![
                ("id", DataType::Int),
                ("name", DataType::Text),
                ("gpa", DataType::Float),
            ]
        );
        assert_eq!(create.position, Position::new(1, 1));
        assert_eq!(create.span, Span::new(0, 53));
    }

    #[test]
    fn parse_insert() {
        let Statement::Insert(insert) = single("INSERT INTO t VALUES (1, 2.5, 'x');") else {
            panic!("expected Insert");
        };
        assert_eq!(insert.table.name, "t");
        let kinds: Vec<_> = insert.values.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![LiteralKind::Integer, LiteralKind::Float, LiteralKind::String]
        );
        assert_eq!(insert.values[2].text, "x");
    }

    #[test]
    fn parse_select_wildcard_and_columns() {
        let Statement::Select(select) = single("SELECT * FROM t;") else {
            panic!("expected Select");
        };
        assert!(matches!(select.columns, SelectList::Wildcard(_)));
        assert!(select.condition.is_none());

        let Statement::Select(select) = single("SELECT a, b FROM t WHERE a = 1;") else {
            panic!("expected Select");
        };
        let SelectList::Columns(columns) = &select.columns else {
            panic!("expected column list");
        };
        assert_eq!(columns.len(), 2);
        assert!(matches!(
            select.condition,
            Some(Condition::Comparison { .. })
        ));
    }

    #[test]
    fn parse_update() {
        let Statement::Update(update) =
            single("UPDATE t SET a = 1, b = 'two' WHERE c >= 3.5;")
        else {
            panic!("expected Update");
        };
        assert_eq!(update.assignments.len(), 2);
        assert_eq!(update.assignments[1].column.name, "b");
        assert_eq!(update.assignments[1].value.text, "two");
        assert!(update.condition.is_some());
    }

    #[test]
    fn parse_delete() {
        let Statement::Delete(delete) = single("DELETE FROM t;") else {
            panic!("expected Delete");
        };
        assert_eq!(delete.table.name, "t");
        assert!(delete.condition.is_none());
    }

    #[test]
    fn parse_create_user() {
        let Statement::CreateUser(user) = single("CREATE USER bob IDENTIFIED BY 'secret';")
        else {
            panic!("expected CreateUser");
        };
        assert_eq!(user.username.name, "bob");
        assert_eq!(user.password.text, "secret");
    }

    #[test]
    fn create_user_requires_string_password() {
        let (statements, diagnostics) = parse_err("CREATE USER bob IDENTIFIED BY 42;");
        assert!(statements.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "expected string literal, found '42'"
        );
    }

    #[test]
    fn parse_grant_with_keyword_privilege() {
        let Statement::Grant(grant) = single("GRANT SELECT ON t TO bob;") else {
            panic!("expected Grant");
        };
        assert_eq!(grant.privilege.name, "SELECT");
        assert_eq!(grant.table.name, "t");
        assert_eq!(grant.user.name, "bob");

        let Statement::Grant(grant) = single("GRANT read ON t TO bob;") else {
            panic!("expected Grant");
        };
        assert_eq!(grant.privilege.name, "read");
    }

    #[test]
    fn grant_rejects_non_dml_keyword_privilege() {
        let (statements, diagnostics) = parse_err("GRANT TABLE ON t TO bob;");
        assert!(statements.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expected privilege, found 'TABLE'");
    }

    #[test]
    fn missing_table_name_recovers_at_semicolon() {
        let (statements, diagnostics) =
            parse_err("CREATE TABLE (id INT);\nCREATE TABLE t (a INT);");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind(), DiagnosticKind::Syntax);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnexpectedToken);
        assert_eq!(diagnostics[0].position, Position::new(1, 14));
        assert_eq!(diagnostics[0].message, "expected table name, found '('");
        assert_eq!(statements.len(), 1);
        assert!(matches!(&statements[0], Statement::CreateTable(c) if c.table.name == "t"));
    }

    #[test]
    fn recovery_stops_at_statement_keyword_without_semicolon() {
        let (statements, diagnostics) = parse_err("SELECT FROM t\nDELETE FROM t;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Statement::Delete(_)));
    }

    #[test]
    fn error_token_that_starts_a_statement_is_not_skipped() {
        // The missing `;` is reported at DELETE, which then parses normally.
        let (statements, diagnostics) = parse_err("SELECT * FROM t DELETE FROM t;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expected ';', found 'DELETE'");
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Statement::Delete(_)));
    }

    #[test]
    fn independent_errors_are_all_reported() {
        let (statements, diagnostics) = parse_err(
            "CREATE TABLE (a INT);\nINSERT t VALUES (1);\nSELECT * FROM t;\nUPDATE t SET;",
        );
        assert_eq!(diagnostics.len(), 3);
        let lines: Vec<_> = diagnostics.iter().map(|d| d.position.line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn one_error_per_failed_statement() {
        let (_, diagnostics) = parse_err("CREATE TABLE t (a INT, b, c FLOAT, ) ;");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn stray_tokens_at_statement_position() {
        let (statements, diagnostics) = parse_err(";; t SELECT * FROM t;");
        // `;` is an error, then resync consumes it. Same for the second `;`.
        // `t` is an error, then resync stops at SELECT.
        assert_eq!(diagnostics.len(), 3);
        assert!(
            diagnostics[0]
                .message
                .starts_with("expected statement")
        );
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn missing_semicolon_at_end_of_input() {
        let (statements, diagnostics) = parse_err("SELECT * FROM t");
        assert!(statements.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expected ';', found end of input");
    }

    #[test]
    fn condition_precedence_not_and_or() {
        let Statement::Delete(delete) =
            single("DELETE FROM t WHERE NOT a = 1 AND b = 2 OR c = 3;")
        else {
            panic!("expected Delete");
        };
        let Some(Condition::Or { left, right, .. }) = delete.condition else {
            panic!("expected OR at the root");
        };
        let Condition::And { left: and_left, .. } = *left else {
            panic!("expected AND under OR");
        };
        assert!(matches!(*and_left, Condition::Not { .. }));
        assert!(matches!(*right, Condition::Comparison { .. }));
    }

    #[test]
    fn parentheses_override_precedence() {
        let Statement::Delete(delete) = single("DELETE FROM t WHERE a = 1 AND (b = 2 OR c = 3);")
        else {
            panic!("expected Delete");
        };
        let Some(Condition::And { right, .. }) = delete.condition else {
            panic!("expected AND at the root");
        };
        assert!(matches!(*right, Condition::Or { .. }));
    }

    #[test]
    fn or_is_left_associative() {
        let Statement::Delete(delete) = single("DELETE FROM t WHERE a = 1 OR b = 2 OR c = 3;")
        else {
            panic!("expected Delete");
        };
        let Some(Condition::Or { left, right, .. }) = delete.condition else {
            panic!("expected OR at the root");
        };
        assert!(matches!(*left, Condition::Or { .. }));
        assert!(matches!(
            *right,
            Condition::Comparison {
                left: Operand::Column(_),
                ..
            }
        ));
    }

    #[test]
    fn comparison_operands_may_be_literals_on_both_sides() {
        let Statement::Select(select) = single("SELECT * FROM t WHERE 1 <> 'x';") else {
            panic!("expected Select");
        };
        assert!(matches!(
            select.condition,
            Some(Condition::Comparison {
                left: Operand::Literal(_),
                right: Operand::Literal(_),
                ..
            })
        ));
    }

    #[test]
    fn deeply_nested_condition_is_rejected_without_overflow() {
        let depth = 200;
        let source = format!(
            "DELETE FROM t WHERE {}a = 1{};\nDELETE FROM t;",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let (statements, diagnostics) = parse_err(&source);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("nested at most 64"));
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn nesting_at_the_limit_is_accepted() {
        let source = format!(
            "DELETE FROM t WHERE {}a = 1{};",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert_eq!(parse_ok(&source).len(), 1);
    }

    #[test]
    fn connectives_at_the_limit_are_accepted() {
        let half = MAX_CONNECTIVES / 2;
        let source = format!(
            "DELETE FROM t WHERE a = 0{}{};",
            " OR a = 1".repeat(half),
            " AND (b = 2)".repeat(MAX_CONNECTIVES - half)
        );
        assert_eq!(parse_ok(&source).len(), 1);
    }

    #[test]
    fn long_or_chain_is_rejected_without_overflow() {
        let source = format!(
            "DELETE FROM t WHERE a = 1{};\nDELETE FROM t;",
            " OR a = 1".repeat(20_000)
        );
        let (statements, diagnostics) = parse_err(&source);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("at most 256 AND/OR operators"));
        assert!(diagnostics[0].message.ends_with("found 'OR'"));
        let column = 27 + u32::try_from(MAX_CONNECTIVES * " OR a = 1".len()).unwrap();
        assert_eq!(diagnostics[0].position, Position::new(1, column));
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn connectives_are_counted_per_condition() {
        let chain = " AND a = 1".repeat(MAX_CONNECTIVES);
        let source = format!(
            "DELETE FROM t WHERE a = 1{chain};\nSELECT * FROM t WHERE a = 1{chain};"
        );
        assert_eq!(parse_ok(&source).len(), 2);
    }

    #[test]
    fn tokens_without_eof_are_tolerated() {
        let (mut tokens, _) = tokenize("DELETE FROM t;");
        tokens.pop();
        let (statements, diagnostics) = parse(tokens);
        assert!(diagnostics.is_empty());
        assert_eq!(statements.len(), 1);

        let (statements, diagnostics) = parse(Vec::new());
        assert!(statements.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn lowercase_keywords_are_identifiers() {
        let (statements, diagnostics) = parse_err("select * from t;");
        assert!(statements.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.ends_with("found 'select'"));
    }
}
