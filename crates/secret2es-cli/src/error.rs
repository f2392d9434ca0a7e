//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use secret2es_convert::ConvertError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// A Secret was rejected by the converter
    #[error("Conversion failed: {message}")]
    #[diagnostic(code(secret2es::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Malformed placeholder syntax
    #[error("Syntax error: {message}")]
    #[diagnostic(code(secret2es::cli::syntax))]
    Syntax {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// `--strict` run that produced warnings
    #[error("{count} secret(s) skipped with warnings")]
    #[diagnostic(
        code(secret2es::cli::strict),
        help("fix the skipped Secrets or drop --strict")
    )]
    StrictWarnings { count: usize },

    /// Invalid arguments or options
    #[error("Invalid usage: {message}")]
    #[diagnostic(code(secret2es::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(secret2es::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(secret2es::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Syntax { .. } => exit_codes::SYNTAX_ERROR,
            CliError::StrictWarnings { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a usage error with help text
    pub fn usage_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an IO error from std::io::Error with the path involved
    pub fn io_at(path: impl std::fmt::Display, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{path}: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<ConvertError> for CliError {
    fn from(err: ConvertError) -> Self {
        let message = err.to_string();
        let help = err.help().map(|help| help.to_string());

        match err {
            err if err.is_syntax() => CliError::Syntax { message, help },
            ConvertError::IllegalStoreKind(_) | ConvertError::IllegalCreationPolicy(_) => {
                CliError::Usage { message, help }
            }
            _ => CliError::Validation { message, help },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
