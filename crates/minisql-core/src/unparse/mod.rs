// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement unparser: renders parsed statements back to text.
//!
//! Two renderings are provided:
//!
//! - [`render_tree`] draws a statement as an indented parse tree, one node per
//!   line. Grammar nodes use statement labels (`SelectStmt`, `Where`,
//!   `OrExpr`, `Comparison`, ...); leaves are the tokens of the statement.
//! - [`to_sql`] prints canonical SQL text. Keywords are upper case, operands
//!   are separated by single spaces, and conditions are parenthesised only
//!   where precedence requires it, so parsing the output yields an equivalent
//!   statement.

use crate::ast::{
    Assignment, ColumnDef, Condition, CreateTable, CreateUser, Delete, Grant, Insert, Literal,
    LiteralKind, Operand, Select, SelectList, Statement, Update,
};

// --- Public entry points ---

/// Renders a statement as an indented parse tree.
///
/// # Examples
///
/// ```
/// use minisql_core::source_analysis::{parse, tokenize};
/// use minisql_core::unparse::render_tree;
///
/// let (tokens, _) = tokenize("DELETE FROM t;");
/// let (statements, _) = parse(tokens);
/// assert_eq!(
///     render_tree(&statements[0]),
///     "DeleteStmt\n  DELETE\n  FROM\n  t\n  WhereOpt\n  ;\n"
/// );
/// ```
#[must_use]
pub fn render_tree(statement: &Statement) -> String {
    let mut out = String::new();
    statement_node(statement).render(0, &mut out);
    out
}

/// Renders a statement as canonical SQL text, terminated by `;`.
///
/// # Examples
///
/// ```
/// use minisql_core::source_analysis::{parse, tokenize};
/// use minisql_core::unparse::to_sql;
///
/// let (tokens, _) = tokenize("SELECT * FROM t WHERE NOT(a=1 OR b=2)AND c<>3;");
/// let (statements, _) = parse(tokens);
/// assert_eq!(
///     to_sql(&statements[0]),
///     "SELECT * FROM t WHERE NOT (a = 1 OR b = 2) AND c <> 3;"
/// );
/// ```
#[must_use]
pub fn to_sql(statement: &Statement) -> String {
    let mut out = String::new();
    write_statement(statement, &mut out);
    out
}

// --- Parse tree ---

/// A node of the rendered parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn branch(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    fn render(&self, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&self.label);
        out.push('\n');
        for child in &self.children {
            child.render(depth + 1, out);
        }
    }
}

fn statement_node(statement: &Statement) -> TreeNode {
    match statement {
        Statement::CreateTable(create) => create_table_node(create),
        Statement::Insert(insert) => insert_node(insert),
        Statement::Select(select) => select_node(select),
        Statement::Update(update) => update_node(update),
        Statement::Delete(delete) => delete_node(delete),
        Statement::CreateUser(user) => create_user_node(user),
        Statement::Grant(grant) => grant_node(grant),
    }
}

fn create_table_node(create: &CreateTable) -> TreeNode {
    let columns = create.columns.iter().map(column_def_node).collect();
    TreeNode::branch(
        "CreateStmt",
        vec![
            TreeNode::leaf("CREATE"),
            TreeNode::leaf("TABLE"),
            TreeNode::leaf(create.table.name.as_str()),
            TreeNode::leaf("("),
            TreeNode::branch("ColumnDefList", columns),
            TreeNode::leaf(")"),
            TreeNode::leaf(";"),
        ],
    )
}

fn column_def_node(column: &ColumnDef) -> TreeNode {
    TreeNode::branch(
        "ColumnDef",
        vec![
            TreeNode::leaf(column.name.name.as_str()),
            TreeNode::leaf(column.data_type.as_str()),
        ],
    )
}

fn insert_node(insert: &Insert) -> TreeNode {
    let values = insert.values.iter().map(literal_node).collect();
    TreeNode::branch(
        "InsertStmt",
        vec![
            TreeNode::leaf("INSERT"),
            TreeNode::leaf("INTO"),
            TreeNode::leaf(insert.table.name.as_str()),
            TreeNode::leaf("VALUES"),
            TreeNode::leaf("("),
            TreeNode::branch("ValueList", values),
            TreeNode::leaf(")"),
            TreeNode::leaf(";"),
        ],
    )
}

fn select_node(select: &Select) -> TreeNode {
    let list = match &select.columns {
        SelectList::Wildcard(_) => vec![TreeNode::leaf("*")],
        SelectList::Columns(columns) => columns
            .iter()
            .map(|c| TreeNode::leaf(c.name.as_str()))
            .collect(),
    };
    TreeNode::branch(
        "SelectStmt",
        vec![
            TreeNode::leaf("SELECT"),
            TreeNode::branch("SelectList", list),
            TreeNode::leaf("FROM"),
            TreeNode::leaf(select.table.name.as_str()),
            where_node(select.condition.as_ref()),
            TreeNode::leaf(";"),
        ],
    )
}

fn update_node(update: &Update) -> TreeNode {
    let assignments = update.assignments.iter().map(assignment_node).collect();
    TreeNode::branch(
        "UpdateStmt",
        vec![
            TreeNode::leaf("UPDATE"),
            TreeNode::leaf(update.table.name.as_str()),
            TreeNode::leaf("SET"),
            TreeNode::branch("AssignList", assignments),
            where_node(update.condition.as_ref()),
            TreeNode::leaf(";"),
        ],
    )
}

fn assignment_node(assignment: &Assignment) -> TreeNode {
    TreeNode::branch(
        "Assign",
        vec![
            TreeNode::leaf(assignment.column.name.as_str()),
            TreeNode::leaf("="),
            literal_node(&assignment.value),
        ],
    )
}

fn delete_node(delete: &Delete) -> TreeNode {
    TreeNode::branch(
        "DeleteStmt",
        vec![
            TreeNode::leaf("DELETE"),
            TreeNode::leaf("FROM"),
            TreeNode::leaf(delete.table.name.as_str()),
            where_node(delete.condition.as_ref()),
            TreeNode::leaf(";"),
        ],
    )
}

fn create_user_node(user: &CreateUser) -> TreeNode {
    TreeNode::branch(
        "CreateUserStmt",
        vec![
            TreeNode::leaf("CREATE"),
            TreeNode::leaf("USER"),
            TreeNode::leaf(user.username.name.as_str()),
            TreeNode::leaf("IDENTIFIED"),
            TreeNode::leaf("BY"),
            literal_node(&user.password),
            TreeNode::leaf(";"),
        ],
    )
}

fn grant_node(grant: &Grant) -> TreeNode {
    TreeNode::branch(
        "GrantStmt",
        vec![
            TreeNode::leaf("GRANT"),
            TreeNode::leaf(grant.privilege.name.as_str()),
            TreeNode::leaf("ON"),
            TreeNode::leaf(grant.table.name.as_str()),
            TreeNode::leaf("TO"),
            TreeNode::leaf(grant.user.name.as_str()),
            TreeNode::leaf(";"),
        ],
    )
}

fn where_node(condition: Option<&Condition>) -> TreeNode {
    match condition {
        Some(condition) => TreeNode::branch("Where", vec![condition_node(condition)]),
        None => TreeNode::leaf("WhereOpt"),
    }
}

fn condition_node(condition: &Condition) -> TreeNode {
    match condition {
        Condition::Or { left, right, .. } => TreeNode::branch(
            "OrExpr",
            vec![condition_node(left), condition_node(right)],
        ),
        Condition::And { left, right, .. } => TreeNode::branch(
            "AndExpr",
            vec![condition_node(left), condition_node(right)],
        ),
        Condition::Not { inner, .. } => TreeNode::branch("NotExpr", vec![condition_node(inner)]),
        Condition::Comparison {
            left, op, right, ..
        } => TreeNode::branch(
            "Comparison",
            vec![
                operand_node(left),
                TreeNode::leaf(op.as_str()),
                operand_node(right),
            ],
        ),
    }
}

fn operand_node(operand: &Operand) -> TreeNode {
    match operand {
        Operand::Column(column) => TreeNode::leaf(column.name.as_str()),
        Operand::Literal(literal) => literal_node(literal),
    }
}

fn literal_node(literal: &Literal) -> TreeNode {
    let mut text = String::new();
    write_literal(literal, &mut text);
    TreeNode::leaf(text)
}

// --- SQL text ---

fn write_statement(statement: &Statement, out: &mut String) {
    match statement {
        Statement::CreateTable(create) => {
            out.push_str("CREATE TABLE ");
            out.push_str(&create.table.name);
            out.push_str(" (");
            for (i, column) in create.columns.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&column.name.name);
                out.push(' ');
                out.push_str(column.data_type.as_str());
            }
            out.push(')');
        }
        Statement::Insert(insert) => {
            out.push_str("INSERT INTO ");
            out.push_str(&insert.table.name);
            out.push_str(" VALUES (");
            for (i, value) in insert.values.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(value, out);
            }
            out.push(')');
        }
        Statement::Select(select) => {
            out.push_str("SELECT ");
            match &select.columns {
                SelectList::Wildcard(_) => out.push('*'),
                SelectList::Columns(columns) => {
                    for (i, column) in columns.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&column.name);
                    }
                }
            }
            out.push_str(" FROM ");
            out.push_str(&select.table.name);
            write_where(select.condition.as_ref(), out);
        }
        Statement::Update(update) => {
            out.push_str("UPDATE ");
            out.push_str(&update.table.name);
            out.push_str(" SET ");
            for (i, assignment) in update.assignments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&assignment.column.name);
                out.push_str(" = ");
                write_literal(&assignment.value, out);
            }
            write_where(update.condition.as_ref(), out);
        }
        Statement::Delete(delete) => {
            out.push_str("DELETE FROM ");
            out.push_str(&delete.table.name);
            write_where(delete.condition.as_ref(), out);
        }
        Statement::CreateUser(user) => {
            out.push_str("CREATE USER ");
            out.push_str(&user.username.name);
            out.push_str(" IDENTIFIED BY ");
            write_literal(&user.password, out);
        }
        Statement::Grant(grant) => {
            out.push_str("GRANT ");
            out.push_str(&grant.privilege.name);
            out.push_str(" ON ");
            out.push_str(&grant.table.name);
            out.push_str(" TO ");
            out.push_str(&grant.user.name);
        }
    }
    out.push(';');
}

fn write_where(condition: Option<&Condition>, out: &mut String) {
    if let Some(condition) = condition {
        out.push_str(" WHERE ");
        write_condition(condition, Precedence::Or, out);
    }
}

/// Binding strength of condition forms, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Or,
    And,
    Not,
}

impl Precedence {
    const fn of(condition: &Condition) -> Self {
        match condition {
            Condition::Or { .. } => Self::Or,
            Condition::And { .. } => Self::And,
            Condition::Not { .. } | Condition::Comparison { .. } => Self::Not,
        }
    }
}

/// Writes `condition`, parenthesised if it binds more loosely than `context`.
///
/// OR and AND associate to the left, so a right operand of the same
/// precedence needs parentheses.
fn write_condition(condition: &Condition, context: Precedence, out: &mut String) {
    let wrap = Precedence::of(condition) < context;
    if wrap {
        out.push('(');
    }
    match condition {
        Condition::Or { left, right, .. } => {
            write_condition(left, Precedence::Or, out);
            out.push_str(" OR ");
            write_condition(right, Precedence::And, out);
        }
        Condition::And { left, right, .. } => {
            write_condition(left, Precedence::And, out);
            out.push_str(" AND ");
            write_condition(right, Precedence::Not, out);
        }
        Condition::Not { inner, .. } => {
            out.push_str("NOT ");
            write_condition(inner, Precedence::Not, out);
        }
        Condition::Comparison {
            left, op, right, ..
        } => {
            write_operand(left, out);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            write_operand(right, out);
        }
    }
    if wrap {
        out.push(')');
    }
}

fn write_operand(operand: &Operand, out: &mut String) {
    match operand {
        Operand::Column(column) => out.push_str(&column.name),
        Operand::Literal(literal) => write_literal(literal, out),
    }
}

fn write_literal(literal: &Literal, out: &mut String) {
    match literal.kind {
        LiteralKind::Integer | LiteralKind::Float => out.push_str(&literal.text),
        LiteralKind::String => {
            out.push('\'');
            out.push_str(&literal.text);
            out.push('\'');
        }
    }
}
