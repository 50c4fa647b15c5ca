//! Errors surfaced by the command line tool.

use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Props text or a pattern failed to compile.
    #[error(transparent)]
    Compile(#[from] propsheet_core::Error),

    /// A file could not be read or written.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CliError {
    /// Render the error for stderr, locating compile errors in `source`
    pub fn render(&self, source: Option<&str>) -> String {
        match self {
            CliError::Compile(propsheet_core::Error::Syntax(error)) => {
                let location = match source {
                    Some(text) => {
                        let (line, column) = error.span.line_col(text);
                        format!("{}:{}", line, column)
                    }
                    None => format!("offset {}", error.span.start),
                };
                format!("{} {} at {}", "Syntax error:".red().bold(), error.kind, location)
            }
            CliError::Compile(propsheet_core::Error::InternalConsistency(message)) => {
                format!("{} {}", "Internal error:".red().bold(), message)
            }
            other => format!("{} {}", "Error:".red().bold(), other),
        }
    }
}
