// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing.
//!
//! One method per statement production. Each method starts at the statement's
//! first keyword and finishes by consuming the terminating `;`.

use crate::ast::{
    Assignment, ColumnDef, CreateTable, CreateUser, DataType, Delete, Grant, Insert, Select,
    SelectList, Statement, Update,
};
use crate::source_analysis::{Expected, Keyword, Operator, Punctuation, Span, Token, TokenKind};

use super::{ParseResult, Parser, identifier_from};

impl Parser {
    /// Parses one statement, dispatching on its first token.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert().map(Statement::Insert),
            TokenKind::Keyword(Keyword::Select) => self.parse_select().map(Statement::Select),
            TokenKind::Keyword(Keyword::Update) => self.parse_update().map(Statement::Update),
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete().map(Statement::Delete),
            TokenKind::Keyword(Keyword::Grant) => self.parse_grant().map(Statement::Grant),
            _ => Err(self.unexpected(Expected::Statement)),
        }
    }

    /// Consumes the terminating `;` and returns the statement's full span.
    fn finish_statement(&mut self, start: &Token) -> ParseResult<Span> {
        let semicolon = self.expect_punctuation(Punctuation::Semicolon)?;
        Ok(start.span().merge(semicolon.span()))
    }

    /// `CREATE TABLE ...` or `CREATE USER ...`.
    fn parse_create(&mut self) -> ParseResult<Statement> {
        let start = self.expect_keyword(Keyword::Create)?;
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Table) => {
                self.advance();
                self.parse_create_table(&start).map(Statement::CreateTable)
            }
            TokenKind::Keyword(Keyword::User) => {
                self.advance();
                self.parse_create_user(&start).map(Statement::CreateUser)
            }
            _ => Err(self.unexpected(Expected::CreateTarget)),
        }
    }

    /// The rest of `CREATE TABLE ident '(' colDef (',' colDef)* ')' ';'`.
    fn parse_create_table(&mut self, start: &Token) -> ParseResult<CreateTable> {
        let table = self.expect_identifier("table")?;
        self.expect_punctuation(Punctuation::LeftParen)?;
        let mut columns = vec![self.parse_column_def()?];
        while self.match_token(TokenKind::Punctuation(Punctuation::Comma)) {
            columns.push(self.parse_column_def()?);
        }
        self.expect_punctuation(Punctuation::RightParen)?;
        let span = self.finish_statement(start)?;
        Ok(CreateTable {
            table,
            columns,
            span,
            position: start.position(),
        })
    }

    /// `colDef ::= ident (INT | FLOAT | TEXT)`
    fn parse_column_def(&mut self) -> ParseResult<ColumnDef> {
        let name = self.expect_identifier("column")?;
        let data_type = match self.current_kind() {
            TokenKind::Keyword(kw) => DataType::from_keyword(kw),
            _ => None,
        };
        let Some(data_type) = data_type else {
            return Err(self.unexpected(Expected::DataType));
        };
        let type_token = self.advance();
        let span = name.span.merge(type_token.span());
        Ok(ColumnDef {
            name,
            data_type,
            span,
        })
    }

    /// The rest of `CREATE USER ident IDENTIFIED BY stringLiteral ';'`.
    fn parse_create_user(&mut self, start: &Token) -> ParseResult<CreateUser> {
        let username = self.expect_identifier("user")?;
        self.expect_keyword(Keyword::Identified)?;
        self.expect_keyword(Keyword::By)?;
        if !self.check(TokenKind::String) {
            return Err(self.unexpected(Expected::StringLiteral));
        }
        let password = self.parse_literal()?;
        let span = self.finish_statement(start)?;
        Ok(CreateUser {
            username,
            password,
            span,
            position: start.position(),
        })
    }

    /// `INSERT INTO ident VALUES '(' literal (',' literal)* ')' ';'`
    fn parse_insert(&mut self) -> ParseResult<Insert> {
        let start = self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_identifier("table")?;
        self.expect_keyword(Keyword::Values)?;
        self.expect_punctuation(Punctuation::LeftParen)?;
        let mut values = vec![self.parse_literal()?];
        while self.match_token(TokenKind::Punctuation(Punctuation::Comma)) {
            values.push(self.parse_literal()?);
        }
        self.expect_punctuation(Punctuation::RightParen)?;
        let span = self.finish_statement(&start)?;
        Ok(Insert {
            table,
            values,
            span,
            position: start.position(),
        })
    }

    /// `SELECT ('*' | ident (',' ident)*) FROM ident (WHERE condition)? ';'`
    fn parse_select(&mut self) -> ParseResult<Select> {
        let start = self.expect_keyword(Keyword::Select)?;
        let columns = match self.current_kind() {
            TokenKind::Operator(Operator::Star) => SelectList::Wildcard(self.advance().span()),
            TokenKind::Identifier => {
                let mut columns = vec![self.expect_identifier("column")?];
                while self.match_token(TokenKind::Punctuation(Punctuation::Comma)) {
                    columns.push(self.expect_identifier("column")?);
                }
                SelectList::Columns(columns)
            }
            _ => return Err(self.unexpected(Expected::SelectList)),
        };
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier("table")?;
        let condition = self.parse_where_clause()?;
        let span = self.finish_statement(&start)?;
        Ok(Select {
            columns,
            table,
            condition,
            span,
            position: start.position(),
        })
    }

    /// `UPDATE ident SET assign (',' assign)* (WHERE condition)? ';'`
    fn parse_update(&mut self) -> ParseResult<Update> {
        let start = self.expect_keyword(Keyword::Update)?;
        let table = self.expect_identifier("table")?;
        self.expect_keyword(Keyword::Set)?;
        let mut assignments = vec![self.parse_assignment()?];
        while self.match_token(TokenKind::Punctuation(Punctuation::Comma)) {
            assignments.push(self.parse_assignment()?);
        }
        let condition = self.parse_where_clause()?;
        let span = self.finish_statement(&start)?;
        Ok(Update {
            table,
            assignments,
            condition,
            span,
            position: start.position(),
        })
    }

    /// `assign ::= ident '=' literal`
    fn parse_assignment(&mut self) -> ParseResult<Assignment> {
        let column = self.expect_identifier("column")?;
        self.expect(TokenKind::Operator(Operator::Eq), Expected::Symbol("="))?;
        let value = self.parse_literal()?;
        let span = column.span.merge(value.span);
        Ok(Assignment {
            column,
            value,
            span,
        })
    }

    /// `DELETE FROM ident (WHERE condition)? ';'`
    fn parse_delete(&mut self) -> ParseResult<Delete> {
        let start = self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier("table")?;
        let condition = self.parse_where_clause()?;
        let span = self.finish_statement(&start)?;
        Ok(Delete {
            table,
            condition,
            span,
            position: start.position(),
        })
    }

    /// `GRANT privilege ON ident TO ident ';'`
    fn parse_grant(&mut self) -> ParseResult<Grant> {
        let start = self.expect_keyword(Keyword::Grant)?;
        let privilege = match self.current_kind() {
            TokenKind::Identifier
            | TokenKind::Keyword(
                Keyword::Select | Keyword::Insert | Keyword::Update | Keyword::Delete,
            ) => identifier_from(&self.advance()),
            _ => return Err(self.unexpected(Expected::Privilege)),
        };
        self.expect_keyword(Keyword::On)?;
        let table = self.expect_identifier("table")?;
        self.expect_keyword(Keyword::To)?;
        let user = self.expect_identifier("user")?;
        let span = self.finish_statement(&start)?;
        Ok(Grant {
            privilege,
            table,
            user,
            span,
            position: start.position(),
        })
    }
}
