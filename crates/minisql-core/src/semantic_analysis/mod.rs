// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for minisql.
//!
//! Statements are checked strictly in program order against one
//! [`SymbolTable`] that the analysis owns, so later statements see the effects
//! of earlier ones and nothing resolves forward. Each statement is checked on
//! its own: a failure in one never stops the next from being checked or from
//! succeeding.
//!
//! The analysis produces:
//! - the final symbol table,
//! - [`Annotations`], a side table keyed by node span giving the resolved type
//!   (and, for columns, the owning table and column index) of each identifier
//!   and literal that resolved,
//! - one [`StatementOutcome`] per statement,
//! - semantic diagnostics.
//!
//! Statement nodes are never modified.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::ast::{
    Condition, CreateTable, CreateUser, DataType, Delete, Grant, Identifier, Insert, Literal,
    Operand, Select, SelectList, Statement, Update,
};
use crate::source_analysis::{Diagnostic, Position, Span};

pub mod error;
pub mod symbol_table;


pub use error::{SemanticError, SemanticErrorKind};
pub use symbol_table::{
    Column, GrantOutcome, GrantedPrivilege, SymbolTable, TableSchema, UserRecord,
};

/// Result of semantic analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisResult {
    /// Every table and user declared by an accepted statement.
    pub symbol_table: SymbolTable,

    /// Resolution data for identifiers and literals, keyed by span.
    pub annotations: Annotations,

    /// `outcomes[i]` is the outcome of the `i`th statement.
    pub outcomes: Vec<StatementOutcome>,

    /// Diagnostics (errors and warnings) from analysis.
    pub diagnostics: Vec<Diagnostic>,
}

/// Whether a statement passed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementOutcome {
    /// No errors (warnings allowed). Declarations took effect.
    Accepted,
    /// At least one error. Declarations did not take effect.
    Rejected,
}

/// A resolved reference to a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: EcoString,
    pub column: EcoString,
    /// Position of the column in its table, starting at 0.
    pub index: usize,
}

/// What an identifier or literal resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// A column of a declared table.
    Column {
        data_type: DataType,
        column: ColumnRef,
    },
    /// A literal and its lexical type.
    Literal { data_type: DataType },
    /// A declared table.
    Table { name: EcoString },
    /// A declared user.
    User { name: EcoString },
}

impl Annotation {
    /// Returns the resolved type, if the node has one.
    #[must_use]
    pub const fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Column { data_type, .. } | Self::Literal { data_type } => Some(*data_type),
            Self::Table { .. } | Self::User { .. } => None,
        }
    }
}

/// Span-keyed side table of [`Annotation`]s, iterated in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotations {
    entries: BTreeMap<Span, Annotation>,
}

impl Annotations {
    /// Returns the annotation for the node at `span`.
    #[must_use]
    pub fn get(&self, span: Span) -> Option<&Annotation> {
        self.entries.get(&span)
    }

    /// Returns all annotations in source order.
    pub fn iter(&self) -> impl Iterator<Item = (Span, &Annotation)> {
        self.entries.iter().map(|(span, annotation)| (*span, annotation))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, span: Span, annotation: Annotation) {
        self.entries.insert(span, annotation);
    }
}

/// Analyse statements in program order.
///
/// # Examples
///
/// ```
/// use minisql_core::semantic_analysis::{StatementOutcome, analyse};
/// use minisql_core::source_analysis::{parse, tokenize};
///
/// let (tokens, _) = tokenize("CREATE TABLE t (a INT); SELECT b FROM t;");
/// let (statements, _) = parse(tokens);
/// let result = analyse(&statements);
///
/// assert_eq!(
///     result.outcomes,
///     vec![StatementOutcome::Accepted, StatementOutcome::Rejected]
/// );
/// assert_eq!(result.diagnostics.len(), 1);
/// ```
#[must_use]
pub fn analyse(statements: &[Statement]) -> AnalysisResult {
    let mut analyser = Analyser::default();
    for statement in statements {
        let errors_before = analyser.error_count();
        analyser.analyse_statement(statement);
        let outcome = if analyser.error_count() > errors_before {
            StatementOutcome::Rejected
        } else {
            StatementOutcome::Accepted
        };
        tracing::trace!(
            statement = statement.kind_name(),
            position = %statement.position(),
            ?outcome,
            "analysed statement"
        );
        analyser.result.outcomes.push(outcome);
    }
    analyser.result
}

/// Internal analyser state.
#[derive(Default)]
struct Analyser {
    result: AnalysisResult,
}

impl Analyser {
    fn error_count(&self) -> usize {
        self.result
            .diagnostics
            .iter()
            .filter(|d| d.is_error())
            .count()
    }

    fn report(&mut self, kind: SemanticErrorKind, span: Span, position: Position) {
        self.result
            .diagnostics
            .push(SemanticError::new(kind, span, position).into());
    }

    fn report_at(&mut self, kind: SemanticErrorKind, node: &Identifier) {
        self.report(kind, node.span, node.position);
    }

    fn annotate(&mut self, span: Span, annotation: Annotation) {
        self.result.annotations.insert(span, annotation);
    }

    fn analyse_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::CreateTable(create) => self.analyse_create_table(create),
            Statement::Insert(insert) => self.analyse_insert(insert),
            Statement::Select(select) => self.analyse_select(select),
            Statement::Update(update) => self.analyse_update(update),
            Statement::Delete(delete) => self.analyse_delete(delete),
            Statement::CreateUser(user) => self.analyse_create_user(user),
            Statement::Grant(grant) => self.analyse_grant(grant),
        }
    }

    /// Resolves a table reference, reporting `UndefinedTable` if it is missing.
    fn resolve_table(&mut self, table: &Identifier) -> Option<TableSchema> {
        if let Some(schema) = self.result.symbol_table.table(&table.name) {
            let schema = schema.clone();
            self.annotate(
                table.span,
                Annotation::Table {
                    name: schema.name.clone(),
                },
            );
            Some(schema)
        } else {
            self.report_at(
                SemanticErrorKind::UndefinedTable {
                    table: table.name.clone(),
                },
                table,
            );
            None
        }
    }

    /// Resolves a column of `schema`, reporting `UndefinedColumn` if it is missing.
    fn resolve_column(&mut self, schema: &TableSchema, column: &Identifier) -> Option<DataType> {
        let Some((index, definition)) = schema.column(&column.name) else {
            self.report_at(
                SemanticErrorKind::UndefinedColumn {
                    table: schema.name.clone(),
                    column: column.name.clone(),
                },
                column,
            );
            return None;
        };
        let data_type = definition.data_type;
        self.annotate(
            column.span,
            Annotation::Column {
                data_type,
                column: ColumnRef {
                    table: schema.name.clone(),
                    column: definition.name.clone(),
                    index,
                },
            },
        );
        Some(data_type)
    }

    fn annotate_literal(&mut self, literal: &Literal) -> DataType {
        let data_type = literal.data_type();
        self.annotate(literal.span, Annotation::Literal { data_type });
        data_type
    }

    /// Checks that `value` may be stored in a column of type `expected`.
    fn check_value(&mut self, column: &EcoString, expected: DataType, value: &Literal) {
        let found = self.annotate_literal(value);
        if !expected.accepts(found) {
            self.report(
                SemanticErrorKind::ValueTypeMismatch {
                    column: column.clone(),
                    expected,
                    found,
                },
                value.span,
                value.position,
            );
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn analyse_create_table(&mut self, create: &CreateTable) {
        let mut ok = true;
        if self.result.symbol_table.table(&create.table.name).is_some() {
            self.report_at(
                SemanticErrorKind::TableRedeclared {
                    table: create.table.name.clone(),
                },
                &create.table,
            );
            ok = false;
        }

        for (i, column) in create.columns.iter().enumerate() {
            let seen_before = create.columns[..i]
                .iter()
                .any(|earlier| earlier.name.name == column.name.name);
            if seen_before {
                self.report_at(
                    SemanticErrorKind::DuplicateColumn {
                        table: create.table.name.clone(),
                        column: column.name.name.clone(),
                    },
                    &column.name,
                );
                ok = false;
            }
        }

        if !ok {
            return;
        }

        let schema = TableSchema {
            name: create.table.name.clone(),
            columns: create
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.name.clone(),
                    data_type: c.data_type,
                    span: c.span,
                })
                .collect(),
            span: create.table.span,
        };
        self.annotate(
            create.table.span,
            Annotation::Table {
                name: schema.name.clone(),
            },
        );
        for (index, column) in create.columns.iter().enumerate() {
            self.annotate(
                column.name.span,
                Annotation::Column {
                    data_type: column.data_type,
                    column: ColumnRef {
                        table: schema.name.clone(),
                        column: column.name.name.clone(),
                        index,
                    },
                },
            );
        }
        tracing::debug!(
            table = %schema.name,
            columns = schema.arity(),
            "table defined"
        );
        self.result.symbol_table.define_table(schema);
    }

    fn analyse_insert(&mut self, insert: &Insert) {
        let Some(schema) = self.resolve_table(&insert.table) else {
            return;
        };

        if insert.values.len() != schema.arity() {
            for value in &insert.values {
                self.annotate_literal(value);
            }
            let (span, position) = match (insert.values.first(), insert.values.last()) {
                (Some(first), Some(last)) => (first.span.merge(last.span), first.position),
                _ => (insert.table.span, insert.table.position),
            };
            self.report(
                SemanticErrorKind::ArityMismatch {
                    table: schema.name.clone(),
                    expected: schema.arity(),
                    found: insert.values.len(),
                },
                span,
                position,
            );
            return;
        }

        for (column, value) in schema.columns.iter().zip(&insert.values) {
            self.check_value(&column.name, column.data_type, value);
        }
        tracing::debug!(table = %schema.name, "insert validated");
    }

    fn analyse_select(&mut self, select: &Select) {
        let Some(schema) = self.resolve_table(&select.table) else {
            return;
        };
        if let SelectList::Columns(columns) = &select.columns {
            for column in columns {
                self.resolve_column(&schema, column);
            }
        }
        if let Some(condition) = &select.condition {
            self.check_condition(&schema, condition);
        }
    }

    fn analyse_update(&mut self, update: &Update) {
        let Some(schema) = self.resolve_table(&update.table) else {
            return;
        };
        for assignment in &update.assignments {
            match self.resolve_column(&schema, &assignment.column) {
                Some(expected) => {
                    self.check_value(&assignment.column.name, expected, &assignment.value);
                }
                None => {
                    self.annotate_literal(&assignment.value);
                }
            }
        }
        if let Some(condition) = &update.condition {
            self.check_condition(&schema, condition);
        }
    }

    fn analyse_delete(&mut self, delete: &Delete) {
        let Some(schema) = self.resolve_table(&delete.table) else {
            return;
        };
        if let Some(condition) = &delete.condition {
            self.check_condition(&schema, condition);
        }
    }

    fn analyse_create_user(&mut self, user: &CreateUser) {
        let defined = self.result.symbol_table.define_user(
            user.username.name.clone(),
            user.password.text.clone(),
            user.username.span,
        );
        if defined {
            self.annotate(
                user.username.span,
                Annotation::User {
                    name: user.username.name.clone(),
                },
            );
            tracing::debug!(user = %user.username.name, "user created");
        } else {
            self.report_at(
                SemanticErrorKind::UserRedeclared {
                    user: user.username.name.clone(),
                },
                &user.username,
            );
        }
    }

    fn analyse_grant(&mut self, grant: &Grant) {
        let table = self.resolve_table(&grant.table);
        let user_known = self.result.symbol_table.user(&grant.user.name).is_some();
        if user_known {
            self.annotate(
                grant.user.span,
                Annotation::User {
                    name: grant.user.name.clone(),
                },
            );
        } else {
            self.report_at(
                SemanticErrorKind::UndefinedUser {
                    user: grant.user.name.clone(),
                },
                &grant.user,
            );
        }

        let (Some(table), true) = (table, user_known) else {
            return;
        };
        let outcome =
            self.result
                .symbol_table
                .grant(&grant.user.name, &grant.privilege.name, &table.name);
        match outcome {
            GrantOutcome::Granted => {
                tracing::debug!(
                    privilege = %grant.privilege.name,
                    table = %table.name,
                    user = %grant.user.name,
                    "privilege granted"
                );
            }
            GrantOutcome::AlreadyGranted => {
                self.report(
                    SemanticErrorKind::DuplicateGrant {
                        privilege: grant.privilege.name.clone(),
                        table: table.name.clone(),
                        user: grant.user.name.clone(),
                    },
                    grant.span,
                    grant.position,
                );
            }
            GrantOutcome::UnknownUser => {}
        }
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    fn check_condition(&mut self, schema: &TableSchema, condition: &Condition) {
        match condition {
            Condition::Or { left, right, .. } | Condition::And { left, right, .. } => {
                self.check_condition(schema, left);
                self.check_condition(schema, right);
            }
            Condition::Not { inner, .. } => self.check_condition(schema, inner),
            Condition::Comparison {
                left, right, span, ..
            } => {
                let left_type = self.resolve_operand(schema, left);
                let right_type = self.resolve_operand(schema, right);
                let (Some(left_type), Some(right_type)) = (left_type, right_type) else {
                    return;
                };
                let compatible = match (left, right) {
                    (Operand::Column(_), Operand::Literal(_)) => left_type.accepts(right_type),
                    (Operand::Literal(_), Operand::Column(_)) => right_type.accepts(left_type),
                    _ => left_type.comparable(right_type),
                };
                if !compatible {
                    self.report(
                        SemanticErrorKind::IncomparableTypes {
                            left: left_type,
                            right: right_type,
                        },
                        *span,
                        left.position(),
                    );
                }
            }
        }
    }

    fn resolve_operand(&mut self, schema: &TableSchema, operand: &Operand) -> Option<DataType> {
        match operand {
            Operand::Column(column) => self.resolve_column(schema, column),
            Operand::Literal(literal) => Some(self.annotate_literal(literal)),
        }
    }
}
