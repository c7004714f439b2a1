// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for pipeline crash safety testing.
//!
//! This target feeds arbitrary byte sequences through lexing, parsing and
//! semantic analysis and asserts that none of them panics. Every input must
//! produce tokens, statements and diagnostics.
//!
//! # Success Criteria
//!
//! The pipeline passes fuzzing if:
//! - It never panics on any input
//! - The token stream always ends with exactly one `Eof`
//! - Every diagnostic span lies within the input
//! - There is one analysis outcome per parsed statement

#![no_main]

use libfuzzer_sys::fuzz_target;
use minisql_core::pipeline::check_source;

fuzz_target!(|data: &[u8]| {
    // Source files are text; invalid UTF-8 is rejected before lexing.
    if let Ok(source) = std::str::from_utf8(data) {
        let output = check_source(source);

        let eofs = output.tokens.iter().filter(|t| t.kind().is_eof()).count();
        assert_eq!(eofs, 1);
        assert!(output.tokens.last().is_some_and(|t| t.kind().is_eof()));

        for diagnostic in output.diagnostics() {
            assert!(diagnostic.span.end() as usize <= source.len());
        }
        assert_eq!(output.analysis.outcomes.len(), output.statements.len());
    }
});
