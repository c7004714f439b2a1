// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for minisql.
//!
//! The AST is a closed set of tagged variants: one [`Statement`] variant per
//! statement form and one [`Condition`] variant per boolean form, so the parser
//! and the analyzer handle every case exhaustively.
//!
//! Every node carries a [`Span`] (byte range, used for source snippets and as
//! the key of the analyzer's annotation table). Statements, identifiers and
//! literals also carry the [`Position`] of their first character.
//!
//! Nodes are never modified after parsing. Operator precedence lives only in
//! the shape of the [`Condition`] tree; parentheses leave no node behind.
//!
//! # Example
//!
//! ```ignore
//! // Source: DELETE FROM t WHERE a = 1;
//! Statement::Delete(Delete {
//!     table: Identifier { name: "t", .. },
//!     condition: Some(Condition::Comparison {
//!         left: Operand::Column(Identifier { name: "a", .. }),
//!         op: ComparisonOp::Eq,
//!         right: Operand::Literal(Literal { kind: LiteralKind::Integer, text: "1", .. }),
//!         span: ..
//!     }),
//!     span: ..,
//!     position: ..
//! })
//! ```

use ecow::EcoString;

use crate::source_analysis::{Keyword, Operator, Position, Span};

/// A column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Text,
}

impl DataType {
    /// Returns `true` if a value of type `value` may be stored where `self` is
    /// expected.
    ///
    /// Widening is one-directional: `Float` accepts `Int`, nothing else widens.
    ///
    /// ```
    /// use minisql_core::ast::DataType;
    ///
    /// assert!(DataType::Float.accepts(DataType::Int));
    /// assert!(!DataType::Int.accepts(DataType::Float));
    /// ```
    #[must_use]
    pub const fn accepts(self, value: Self) -> bool {
        matches!(
            (self, value),
            (Self::Int, Self::Int)
                | (Self::Float, Self::Float | Self::Int)
                | (Self::Text, Self::Text)
        )
    }

    /// Returns `true` if either type widens to the other.
    #[must_use]
    pub const fn comparable(self, other: Self) -> bool {
        self.accepts(other) || other.accepts(self)
    }

    /// Maps a type keyword (`INT`, `FLOAT`, `TEXT`) to its type.
    #[must_use]
    pub const fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Int => Some(Self::Int),
            Keyword::Float => Some(Self::Float),
            Keyword::Text => Some(Self::Text),
            _ => None,
        }
    }

    /// Returns the type's keyword spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Text => "TEXT",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-chosen name: table, column, user or privilege.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The name, exactly as written.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
    /// Line and column of the first character.
    pub position: Position,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span, position: Position) -> Self {
        Self {
            name: name.into(),
            span,
            position,
        }
    }
}

/// The lexical type of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
}

/// A literal value, kept as source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Integer, float or string.
    pub kind: LiteralKind,
    /// The literal text. Strings exclude their quotes.
    pub text: EcoString,
    /// Source location (strings include their quotes).
    pub span: Span,
    /// Line and column of the first character.
    pub position: Position,
}

impl Literal {
    /// Creates a new literal.
    #[must_use]
    pub fn new(
        kind: LiteralKind,
        text: impl Into<EcoString>,
        span: Span,
        position: Position,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            position,
        }
    }

    /// Returns the type this literal carries.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self.kind {
            LiteralKind::Integer => DataType::Int,
            LiteralKind::Float => DataType::Float,
            LiteralKind::String => DataType::Text,
        }
    }
}

/// A comparison operator.
///
/// `!=` and `<>` mean the same thing but are kept apart so statements render
/// back the way they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    LtGt,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl ComparisonOp {
    /// Maps an operator token to a comparison. `*` is not a comparison.
    #[must_use]
    pub const fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Eq => Some(Self::Eq),
            Operator::NotEq => Some(Self::NotEq),
            Operator::LtGt => Some(Self::LtGt),
            Operator::Lt => Some(Self::Lt),
            Operator::Gt => Some(Self::Gt),
            Operator::LtEq => Some(Self::LtEq),
            Operator::GtEq => Some(Self::GtEq),
            Operator::Star => None,
        }
    }

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
        }
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A column of the statement's table.
    Column(Identifier),
    /// A literal value.
    Literal(Literal),
}

impl Operand {
    /// Returns the span of this operand.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Column(id) => id.span,
            Self::Literal(lit) => lit.span,
        }
    }

    /// Returns the position of this operand.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Column(id) => id.position,
            Self::Literal(lit) => lit.position,
        }
    }
}

/// A boolean condition (`WHERE` clause).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `left OR right`
    Or {
        left: Box<Condition>,
        right: Box<Condition>,
        span: Span,
    },
    /// `left AND right`
    And {
        left: Box<Condition>,
        right: Box<Condition>,
        span: Span,
    },
    /// `NOT inner`
    Not { inner: Box<Condition>, span: Span },
    /// `left op right`
    Comparison {
        left: Operand,
        op: ComparisonOp,
        right: Operand,
        span: Span,
    },
}

impl Condition {
    /// Returns the span of this condition.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Or { span, .. }
            | Self::And { span, .. }
            | Self::Not { span, .. }
            | Self::Comparison { span, .. } => *span,
        }
    }
}

/// A column declaration inside `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDef {
    /// The column name.
    pub name: Identifier,
    /// The declared type.
    pub data_type: DataType,
    /// Span of the name and type together.
    pub span: Span,
}

/// `CREATE TABLE name (col TYPE, ...);`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreateTable {
    pub table: Identifier,
    pub columns: Vec<ColumnDef>,
    pub span: Span,
    pub position: Position,
}

/// `INSERT INTO table VALUES (lit, ...);`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Insert {
    pub table: Identifier,
    pub values: Vec<Literal>,
    pub span: Span,
    pub position: Position,
}

/// The projection of a `SELECT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectList {
    /// `*`, with the span of the star.
    Wildcard(Span),
    /// An explicit, non-empty column list.
    Columns(Vec<Identifier>),
}

/// `SELECT cols FROM table [WHERE cond];`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Select {
    pub columns: SelectList,
    pub table: Identifier,
    pub condition: Option<Condition>,
    pub span: Span,
    pub position: Position,
}

/// `column = literal` inside `UPDATE ... SET`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub column: Identifier,
    pub value: Literal,
    pub span: Span,
}

/// `UPDATE table SET assign, ... [WHERE cond];`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Update {
    pub table: Identifier,
    pub assignments: Vec<Assignment>,
    pub condition: Option<Condition>,
    pub span: Span,
    pub position: Position,
}

/// `DELETE FROM table [WHERE cond];`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delete {
    pub table: Identifier,
    pub condition: Option<Condition>,
    pub span: Span,
    pub position: Position,
}

/// `CREATE USER name IDENTIFIED BY 'password';`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreateUser {
    pub username: Identifier,
    /// Always a string literal.
    pub password: Literal,
    pub span: Span,
    pub position: Position,
}

/// `GRANT privilege ON table TO user;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grant {
    /// The privilege, either a plain name or one of `SELECT`, `INSERT`,
    /// `UPDATE`, `DELETE`.
    pub privilege: Identifier,
    pub table: Identifier,
    pub user: Identifier,
    pub span: Span,
    pub position: Position,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    CreateTable(CreateTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
    CreateUser(CreateUser),
    Grant(Grant),
}

impl Statement {
    /// Returns the span of the whole statement, including its `;`.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::CreateTable(s) => s.span,
            Self::Insert(s) => s.span,
            Self::Select(s) => s.span,
            Self::Update(s) => s.span,
            Self::Delete(s) => s.span,
            Self::CreateUser(s) => s.span,
            Self::Grant(s) => s.span,
        }
    }

    /// Returns the position of the statement's first token.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::CreateTable(s) => s.position,
            Self::Insert(s) => s.position,
            Self::Select(s) => s.position,
            Self::Update(s) => s.position,
            Self::Delete(s) => s.position,
            Self::CreateUser(s) => s.position,
            Self::Grant(s) => s.position,
        }
    }

    /// Returns a short name for the statement form.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "CreateTable",
            Self::Insert(_) => "Insert",
            Self::Select(_) => "Select",
            Self::Update(_) => "Update",
            Self::Delete(_) => "Delete",
            Self::CreateUser(_) => "CreateUser",
            Self::Grant(_) => "Grant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_is_one_directional() {
        assert!(DataType::Int.accepts(DataType::Int));
        assert!(DataType::Float.accepts(DataType::Int));
        assert!(DataType::Float.accepts(DataType::Float));
        assert!(DataType::Text.accepts(DataType::Text));
        assert!(!DataType::Int.accepts(DataType::Float));
        assert!(!DataType::Int.accepts(DataType::Text));
        assert!(!DataType::Text.accepts(DataType::Int));
        assert!(!DataType::Float.accepts(DataType::Text));
    }

    #[test]
    fn comparable_is_symmetric() {
        assert!(DataType::Int.comparable(DataType::Float));
        assert!(DataType::Float.comparable(DataType::Int));
        assert!(!DataType::Text.comparable(DataType::Float));
    }

    #[test]
    fn data_type_from_keyword() {
        assert_eq!(DataType::from_keyword(Keyword::Int), Some(DataType::Int));
        assert_eq!(DataType::from_keyword(Keyword::Text), Some(DataType::Text));
        assert_eq!(DataType::from_keyword(Keyword::Table), None);
    }

    #[test]
    fn literal_types() {
        let lit = |kind| Literal::new(kind, "x", Span::default(), Position::default());
        assert_eq!(lit(LiteralKind::Integer).data_type(), DataType::Int);
        assert_eq!(lit(LiteralKind::Float).data_type(), DataType::Float);
        assert_eq!(lit(LiteralKind::String).data_type(), DataType::Text);
    }

    #[test]
    fn star_is_not_a_comparison() {
        assert_eq!(ComparisonOp::from_operator(Operator::Star), None);
        assert_eq!(
            ComparisonOp::from_operator(Operator::LtGt),
            Some(ComparisonOp::LtGt)
        );
    }

    #[test]
    fn statement_accessors() {
        let stmt = Statement::Delete(Delete {
            table: Identifier::new("t", Span::new(12, 13), Position::new(1, 13)),
            condition: None,
            span: Span::new(0, 14),
            position: Position::new(1, 1),
        });
        assert_eq!(stmt.span(), Span::new(0, 14));
        assert_eq!(stmt.position(), Position::new(1, 1));
        assert_eq!(stmt.kind_name(), "Delete");
    }
}
