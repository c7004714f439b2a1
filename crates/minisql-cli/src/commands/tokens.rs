// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `minisql tokens`: print the token listing of a source file.
//!
//! One row per token, including the final `EOF`:
//!
//! ```text
//! line | col | category       | lexeme
//!    1 |   1 | KEYWORD        | SELECT
//! ```

use camino::Utf8PathBuf;
use miette::{Context, IntoDiagnostic, Result};
use minisql_core::source_analysis::{Token, tokenize};
use std::io::{self, Write};
use tracing::{debug, instrument};

use crate::diagnostic::CheckDiagnostic;

/// Print the tokens of one file. Lexical errors are reported after the
/// listing and make the command fail.
#[instrument(skip_all, fields(path = %path))]
pub fn run_tokens(path: &str) -> Result<()> {
    let file = Utf8PathBuf::from(path);
    let source = std::fs::read_to_string(&file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read '{file}'"))?;

    let (tokens, diagnostics) = tokenize(&source);
    debug!(count = tokens.len(), "Tokenized");

    write_token_listing(&mut io::stdout().lock(), &tokens).into_diagnostic()?;

    for diagnostic in &diagnostics {
        let report = CheckDiagnostic::from_core_diagnostic(diagnostic, file.as_str(), &source);
        eprintln!("{:?}", miette::Report::new(report));
    }

    if !diagnostics.is_empty() {
        let count = diagnostics.len();
        let plural = if count == 1 { "" } else { "s" };
        miette::bail!("{count} lexical error{plural} in '{file}'");
    }
    Ok(())
}

/// Write the `line | col | category | lexeme` table for `tokens`.
pub fn write_token_listing(out: &mut impl Write, tokens: &[Token]) -> io::Result<()> {
    writeln!(out, "line | col | {:<14} | lexeme", "category")?;
    for token in tokens {
        let position = token.position();
        writeln!(
            out,
            "{:>4} | {:>3} | {:<14} | {}",
            position.line,
            position.column,
            token.kind().category().as_str(),
            token.lexeme()
        )?;
    }
    Ok(())
}
