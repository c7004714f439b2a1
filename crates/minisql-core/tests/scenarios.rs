// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end checks of the analysis pipeline.
//!
//! Each test feeds a complete program through [`check_source`] and asserts on
//! the diagnostics, statements and symbol table it produces.

use minisql_core::ast::{DataType, Statement};
use minisql_core::pipeline::{CheckOutput, check_source};
use minisql_core::semantic_analysis::StatementOutcome;
use minisql_core::source_analysis::{DiagnosticCode, DiagnosticKind, Position, TokenKind};
use minisql_core::unparse::{render_tree, to_sql};

fn codes(output: &CheckOutput) -> Vec<DiagnosticCode> {
    output.diagnostics().map(|d| d.code).collect()
}

const STUDENTS: &str = "CREATE TABLE students (id INT, name TEXT, age INT);";

#[test]
fn create_table_registers_schema() {
    let output = check_source(STUDENTS);
    assert_eq!(output.diagnostics().count(), 0);

    let table = output
        .analysis
        .symbol_table
        .table("students")
        .expect("students should be declared");
    let columns: Vec<_> = table
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.data_type))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("id", DataType::Int),
            ("name", DataType::Text),
            ("age", DataType::Int),
        ]
    );
}

#[test]
fn table_redeclaration_keeps_first_declaration() {
    let output = check_source("CREATE TABLE t (a INT); CREATE TABLE t (b INT);");
    assert_eq!(codes(&output), vec![DiagnosticCode::Redeclaration]);
    assert_eq!(
        output.analysis.outcomes,
        vec![StatementOutcome::Accepted, StatementOutcome::Rejected]
    );

    let table = output.analysis.symbol_table.table("t").expect("t");
    let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a"]);
}

#[test]
fn insert_with_too_few_values() {
    let output = check_source(&format!(
        "{STUDENTS}\nINSERT INTO students VALUES (101, 'Alice');"
    ));
    assert_eq!(codes(&output), vec![DiagnosticCode::ArityMismatch]);
    let diagnostic = output.diagnostics().next().expect("one diagnostic");
    assert_eq!(diagnostic.kind(), DiagnosticKind::Semantic);
    assert!(diagnostic.message.contains('3'));
    assert!(diagnostic.message.contains('2'));
}

#[test]
fn undefined_table_does_not_stop_later_statements() {
    let output = check_source(&format!(
        "SELECT * FROM ghosts;\n{STUDENTS}\nINSERT INTO students VALUES (1, 'Ann', 20);"
    ));
    assert_eq!(codes(&output), vec![DiagnosticCode::UndefinedTable]);
    assert_eq!(
        output.diagnostics().next().map(|d| d.position),
        Some(Position::new(1, 15))
    );
    assert_eq!(
        output.analysis.outcomes,
        vec![
            StatementOutcome::Rejected,
            StatementOutcome::Accepted,
            StatementOutcome::Accepted,
        ]
    );
}

#[test]
fn stray_character_is_reported_and_skipped() {
    let output = check_source("CREATE TABLE t (a INT);\nSELECT a @ FROM t;");
    assert_eq!(codes(&output), vec![DiagnosticCode::IllegalCharacter]);
    let diagnostic = output.diagnostics().next().expect("one diagnostic");
    assert_eq!(diagnostic.kind(), DiagnosticKind::Lexical);
    assert_eq!(diagnostic.position, Position::new(2, 10));

    // The rest of line 2 is still tokenized.
    let line_two: Vec<_> = output
        .tokens
        .iter()
        .filter(|t| t.position().line == 2 && !t.kind().is_eof())
        .map(|t| t.lexeme().as_str())
        .collect();
    assert_eq!(line_two, vec!["SELECT", "a", "FROM", "t", ";"]);
    assert_eq!(output.statements.len(), 2);
}

#[test]
fn missing_table_name_recovers_at_semicolon() {
    let output = check_source("CREATE TABLE (id INT);\nCREATE TABLE t (a INT);");
    assert_eq!(codes(&output), vec![DiagnosticCode::UnexpectedToken]);
    let diagnostic = output.diagnostics().next().expect("one diagnostic");
    assert_eq!(diagnostic.kind(), DiagnosticKind::Syntax);
    assert_eq!(diagnostic.position, Position::new(1, 14));

    assert_eq!(output.statements.len(), 1);
    let Statement::CreateTable(create) = &output.statements[0] else {
        panic!("expected CREATE TABLE, got {:?}", output.statements[0]);
    };
    assert_eq!(create.table.name, "t");
    assert!(output.analysis.symbol_table.table("t").is_some());
}

#[test]
fn checking_is_deterministic() {
    let source = format!(
        "{STUDENTS}\nINSERT INTO students VALUES (1, 2, 3);\n\
         SELECT nope FROM students WHERE age > 'x';\n! DELETE students;\n\
         CREATE USER u IDENTIFIED BY 'p'; GRANT SELECT ON students TO u;"
    );
    assert_eq!(check_source(&source), check_source(&source));
}

#[test]
fn lexical_and_syntax_errors_in_one_run() {
    let output = check_source("CREATE TABLE t (a INT);\n#\nINSERT t VALUES (1);");
    let kinds: Vec<_> = output.diagnostics().map(|d| d.kind()).collect();
    assert_eq!(kinds, vec![DiagnosticKind::Lexical, DiagnosticKind::Syntax]);
}

#[test]
fn semantic_errors_are_isolated() {
    let output = check_source(&format!(
        "{STUDENTS}\n\
         UPDATE students SET age = 'old';\n\
         UPDATE students SET age = 21 WHERE name = 'Ann';\n\
         DELETE FROM students WHERE gpa > 3;\n\
         DELETE FROM students WHERE id = 7;"
    ));
    assert_eq!(
        output.analysis.outcomes,
        vec![
            StatementOutcome::Accepted,
            StatementOutcome::Rejected,
            StatementOutcome::Accepted,
            StatementOutcome::Rejected,
            StatementOutcome::Accepted,
        ]
    );
}

#[test]
fn widening_is_one_directional() {
    let output = check_source(
        "CREATE TABLE scores (whole INT, ratio FLOAT);\n\
         INSERT INTO scores VALUES (1, 2);\n\
         INSERT INTO scores VALUES (1.5, 2.5);\n\
         SELECT * FROM scores WHERE ratio >= 1;\n\
         SELECT * FROM scores WHERE whole < 1.5;",
    );
    assert_eq!(
        codes(&output),
        vec![DiagnosticCode::TypeMismatch, DiagnosticCode::TypeMismatch]
    );
    assert_eq!(
        output.analysis.outcomes,
        vec![
            StatementOutcome::Accepted,
            StatementOutcome::Accepted,
            StatementOutcome::Rejected,
            StatementOutcome::Accepted,
            StatementOutcome::Rejected,
        ]
    );
}

#[test]
fn every_independent_syntax_error_is_reported() {
    let output = check_source(
        "SELECT FROM t;\nINSERT INTO t VALUES 1;\nUPDATE t a = 1;\nDELETE FROM t;",
    );
    assert_eq!(
        codes(&output),
        vec![
            DiagnosticCode::UnexpectedToken,
            DiagnosticCode::UnexpectedToken,
            DiagnosticCode::UnexpectedToken,
            DiagnosticCode::UndefinedTable,
        ]
    );
    let lines: Vec<_> = output.diagnostics().map(|d| d.position.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4]);
}

#[test]
fn unterminated_string_swallows_rest_of_input() {
    let output = check_source("CREATE USER u IDENTIFIED BY 'oops;\nDELETE FROM t;");
    let kinds: Vec<_> = output.diagnostics().map(|d| d.kind()).collect();
    assert_eq!(kinds, vec![DiagnosticKind::Lexical, DiagnosticKind::Syntax]);
    assert_eq!(
        output.diagnostics().next().map(|d| d.position),
        Some(Position::new(1, 29))
    );
    assert_eq!(output.tokens.last().map(|t| t.kind()), Some(TokenKind::Eof));
    assert!(output.statements.is_empty());
}

const SCORES: &str = "CREATE TABLE scores (whole INT, ratio FLOAT);";

fn count_nodes(tree: &str, label: &str) -> usize {
    tree.lines().filter(|line| line.trim() == label).count()
}

/// Canonical SQL of every statement in `source`, checking that the source
/// is clean.
fn canonical(source: &str) -> Vec<String> {
    let output = check_source(source);
    assert_eq!(output.diagnostics().count(), 0, "{source}");
    output.statements.iter().map(to_sql).collect()
}

#[test]
fn condition_at_every_limit_runs_all_phases() {
    let chain = " OR ratio > 1".repeat(128) + &" AND whole = 2".repeat(128);
    let source = format!(
        "{SCORES}\nSELECT * FROM scores WHERE {}ratio > 1{chain}{};\n\
         DELETE FROM scores WHERE {}whole = 1;",
        "(".repeat(64),
        ")".repeat(64),
        "NOT ".repeat(64)
    );
    let output = check_source(&source);
    assert_eq!(output.diagnostics().count(), 0);
    assert_eq!(output.analysis.outcomes, vec![StatementOutcome::Accepted; 3]);

    let select_tree = render_tree(&output.statements[1]);
    assert_eq!(count_nodes(&select_tree, "OrExpr"), 128);
    assert_eq!(count_nodes(&select_tree, "AndExpr"), 128);
    assert_eq!(count_nodes(&select_tree, "Comparison"), 257);
    assert_eq!(count_nodes(&render_tree(&output.statements[2]), "NotExpr"), 64);

    let sql: Vec<String> = output.statements.iter().map(to_sql).collect();
    assert_eq!(canonical(&sql.concat()), sql);
}

#[test]
fn condition_past_each_limit_is_a_syntax_error() {
    let source = format!(
        "{SCORES}\n\
         SELECT * FROM scores WHERE {}ratio > 1{};\n\
         DELETE FROM scores WHERE {}whole = 1;\n\
         DELETE FROM scores WHERE whole = 1{};\n\
         SELECT * FROM scores WHERE ratio >= 1;",
        "(".repeat(65),
        ")".repeat(65),
        "NOT ".repeat(65),
        " AND whole = 1".repeat(257)
    );
    let output = check_source(&source);
    let lines: Vec<_> = output.diagnostics().map(|d| (d.kind(), d.position.line)).collect();
    assert_eq!(
        lines,
        vec![
            (DiagnosticKind::Syntax, 2),
            (DiagnosticKind::Syntax, 3),
            (DiagnosticKind::Syntax, 4),
        ]
    );
    assert_eq!(output.statements.len(), 2);
    assert_eq!(
        output.analysis.outcomes,
        vec![StatementOutcome::Accepted, StatementOutcome::Accepted]
    );
}

#[test]
fn very_long_where_chain_does_not_overflow() {
    let source = format!(
        "{SCORES} SELECT * FROM scores WHERE whole = 1{}; DELETE FROM scores;",
        " OR whole = 1".repeat(20_000)
    );
    let output = check_source(&source);
    assert_eq!(codes(&output), vec![DiagnosticCode::UnexpectedToken]);
    assert_eq!(output.statements.len(), 2);
    assert_eq!(output.analysis.outcomes, vec![StatementOutcome::Accepted; 2]);
}
