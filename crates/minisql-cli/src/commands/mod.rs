// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod check;
pub mod config;
pub mod sources;
pub mod tokens;
