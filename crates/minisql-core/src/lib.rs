// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! minisql compiler front end.
//!
//! This crate contains the three analysis phases for the minisql language:
//! - Lexical analysis (tokenization)
//! - Parsing (statement construction with panic-mode recovery)
//! - Semantic analysis (symbol table, name resolution, type widening)
//!
//! Every phase accumulates diagnostics instead of stopping at the first
//! problem. [`pipeline::check_source`] runs all three in one call.

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod pipeline;
pub mod semantic_analysis;
pub mod source_analysis;
pub mod unparse;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Condition, DataType, Identifier, Literal, Operand, Statement};
    pub use crate::pipeline::{CheckOutput, check_source};
    pub use crate::semantic_analysis::{AnalysisResult, StatementOutcome, SymbolTable};
    pub use crate::source_analysis::{Diagnostic, DiagnosticKind, Position, Severity, Span};
}
