// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Project configuration from `minisql.toml`.
//!
//! The file is optional and every key in it is optional:
//!
//! ```toml
//! [check]
//! format = "json"        # "text" (default) or "json"
//! deny_warnings = true
//! show_tokens = false
//! show_tree = false
//! ```
//!
//! Command-line flags override the file.

use camino::Utf8Path;
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs;

use super::check::OutputFormat;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "minisql.toml";

/// The top-level structure parsed from `minisql.toml`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The `[check]` section.
    #[serde(default)]
    pub check: CheckConfig,
}

/// Settings for `minisql check`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    pub format: Option<OutputFormat>,
    pub deny_warnings: Option<bool>,
    pub show_tokens: Option<bool>,
    pub show_tree: Option<bool>,
}

/// Parse a `minisql.toml` file.
pub fn parse_config(path: &Utf8Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read config '{path}'"))?;

    toml::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse config '{path}'"))
}

/// Look for `minisql.toml` in the given directory and parse it if found.
///
/// Returns `None` if no config file exists. Returns an error if the file
/// exists but is malformed.
pub fn find_config(project_root: &Utf8Path) -> Result<Option<Config>> {
    let config_path = project_root.join(CONFIG_FILE);
    if config_path
        .try_exists()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to stat config '{config_path}'"))?
    {
        parse_config(&config_path).map(Some)
    } else {
        Ok(None)
    }
}
