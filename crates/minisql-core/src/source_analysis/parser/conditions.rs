// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `WHERE` conditions, operands and literals.
//!
//! Precedence, loosest first: `OR`, `AND`, `NOT`. `OR` and `AND` are
//! left-associative. Parentheses only shape the tree.

use crate::ast::{ComparisonOp, Condition, Literal, LiteralKind, Operand};
use crate::source_analysis::{Expected, Keyword, Punctuation, TokenKind};

use super::{ParseResult, Parser, identifier_from};

impl Parser {
    /// Parses an optional `WHERE condition`.
    pub(super) fn parse_where_clause(&mut self) -> ParseResult<Option<Condition>> {
        if self.match_token(TokenKind::Keyword(Keyword::Where)) {
            self.reset_connectives();
            self.parse_condition().map(Some)
        } else {
            Ok(None)
        }
    }

    /// `condition ::= term (OR term)*`
    pub(super) fn parse_condition(&mut self) -> ParseResult<Condition> {
        let mut left = self.parse_term()?;
        while self.check(TokenKind::Keyword(Keyword::Or)) {
            self.count_connective()?;
            self.advance();
            let right = self.parse_term()?;
            let span = left.span().merge(right.span());
            left = Condition::Or {
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `term ::= factor (AND factor)*`
    fn parse_term(&mut self) -> ParseResult<Condition> {
        let mut left = self.parse_factor()?;
        while self.check(TokenKind::Keyword(Keyword::And)) {
            self.count_connective()?;
            self.advance();
            let right = self.parse_factor()?;
            let span = left.span().merge(right.span());
            left = Condition::And {
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `factor ::= NOT factor | comparison | '(' condition ')'`
    fn parse_factor(&mut self) -> ParseResult<Condition> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Not) => {
                self.enter_nesting()?;
                let not = self.advance();
                let inner = self.parse_factor();
                self.leave_nesting();
                let inner = inner?;
                let span = not.span().merge(inner.span());
                Ok(Condition::Not {
                    inner: Box::new(inner),
                    span,
                })
            }
            TokenKind::Punctuation(Punctuation::LeftParen) => {
                self.enter_nesting()?;
                self.advance();
                let inner = self.parse_condition();
                self.leave_nesting();
                let inner = inner?;
                self.expect_punctuation(Punctuation::RightParen)?;
                Ok(inner)
            }
            _ => self.parse_comparison(),
        }
    }

    /// `comparison ::= operand compOp operand`
    fn parse_comparison(&mut self) -> ParseResult<Condition> {
        let left = self.parse_operand()?;
        let op = match self.current_kind() {
            TokenKind::Operator(op) => ComparisonOp::from_operator(op),
            _ => None,
        };
        let Some(op) = op else {
            return Err(self.unexpected(Expected::ComparisonOperator));
        };
        self.advance();
        let right = self.parse_operand()?;
        let span = left.span().merge(right.span());
        Ok(Condition::Comparison {
            left,
            op,
            right,
            span,
        })
    }

    /// `operand ::= ident | literal`
    fn parse_operand(&mut self) -> ParseResult<Operand> {
        match self.current_kind() {
            TokenKind::Identifier => Ok(Operand::Column(identifier_from(&self.advance()))),
            kind if kind.is_literal() => self.parse_literal().map(Operand::Literal),
            _ => Err(self.unexpected(Expected::Operand)),
        }
    }

    /// Parses an integer, float or string literal.
    pub(super) fn parse_literal(&mut self) -> ParseResult<Literal> {
        let kind = match self.current_kind() {
            TokenKind::Integer => LiteralKind::Integer,
            TokenKind::Float => LiteralKind::Float,
            TokenKind::String => LiteralKind::String,
            _ => return Err(self.unexpected(Expected::Literal)),
        };
        let token = self.advance();
        Ok(Literal::new(
            kind,
            token.lexeme().clone(),
            token.span(),
            token.position(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ComparisonOp, Condition, Operand, Statement};
    use crate::source_analysis::{Span, parse, tokenize};

    fn where_of(source: &str) -> Condition {
        let (tokens, _) = tokenize(source);
        let (mut statements, diagnostics) = parse(tokens);
        assert!(diagnostics.is_empty(), "unexpected errors: {diagnostics:?}");
        match statements.remove(0) {
            Statement::Delete(delete) => delete.condition.expect("condition"),
            other => panic!("expected Delete, got {other:?}"),
        }
    }

    #[test]
    fn comparison_span_covers_both_operands() {
        let condition = where_of("DELETE FROM t WHERE age >= 18;");
        let Condition::Comparison { op, span, .. } = condition else {
            panic!("expected comparison");
        };
        assert_eq!(op, ComparisonOp::GtEq);
        assert_eq!(span, Span::new(20, 29));
    }

    #[test]
    fn not_binds_tighter_than_and() {
        let condition = where_of("DELETE FROM t WHERE NOT a = 1 AND b = 2;");
        let Condition::And { left, .. } = condition else {
            panic!("expected AND");
        };
        assert!(matches!(*left, Condition::Not { .. }));
    }

    #[test]
    fn double_not() {
        let condition = where_of("DELETE FROM t WHERE NOT NOT a = 1;");
        let Condition::Not { inner, .. } = condition else {
            panic!("expected NOT");
        };
        assert!(matches!(*inner, Condition::Not { .. }));
    }

    #[test]
    fn bang_eq_and_lt_gt_are_kept_apart() {
        let Condition::Comparison { op, .. } = where_of("DELETE FROM t WHERE a != 1;") else {
            panic!("expected comparison");
        };
        assert_eq!(op, ComparisonOp::NotEq);
        let Condition::Comparison { op, .. } = where_of("DELETE FROM t WHERE a <> 1;") else {
            panic!("expected comparison");
        };
        assert_eq!(op, ComparisonOp::LtGt);
    }

    #[test]
    fn string_operand() {
        let Condition::Comparison { right, .. } = where_of("DELETE FROM t WHERE name = 'Al';")
        else {
            panic!("expected comparison");
        };
        let Operand::Literal(lit) = right else {
            panic!("expected literal");
        };
        assert_eq!(lit.text, "Al");
    }

    #[test]
    fn star_is_not_a_comparison_operator() {
        let (tokens, _) = tokenize("DELETE FROM t WHERE a * 1;");
        let (statements, diagnostics) = parse(tokens);
        assert!(statements.is_empty());
        assert_eq!(
            diagnostics[0].message,
            "expected comparison operator, found '*'"
        );
    }

    #[test]
    fn unclosed_parenthesis() {
        let (tokens, _) = tokenize("DELETE FROM t WHERE (a = 1;");
        let (_, diagnostics) = parse(tokens);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expected ')', found ';'");
    }
}
