// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for configuration failures.
//!
//! Figment parse errors and semantic validation failures are converted into
//! [`ConfigError`] values that miette can render with codes and help text.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic metadata.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration could not be parsed or deserialized.
    #[error("failed to load configuration: {message}")]
    #[diagnostic(
        code(satchel::config::parse),
        help("check satchel.toml for syntax errors, unknown keys, or wrong value types")
    )]
    Parse {
        /// Figment's description of what went wrong, including the key path.
        message: String,
    },

    /// A value parsed fine but violates a semantic constraint.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(satchel::config::validation))]
    Validation {
        /// Which constraint failed and the offending value.
        message: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

/// Render a batch of configuration errors to stderr via miette.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        let report = miette::Report::msg(error.to_string());
        eprintln!("{report:?}");
    }
}
