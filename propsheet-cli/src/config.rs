//! Command line configuration.
//!
//! The log level comes from `--log-level`, then the `PROPS2JSON_LOG`
//! environment variable, then the default of `warn`.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use crate::error::CliError;

/// Environment variable consulted for the log level.
pub const LOG_ENV: &str = "PROPS2JSON_LOG";

/// Log level enumeration matching tracing crate levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "props2json")]
#[command(about = "Compile props entries into a JSON property sheet")]
#[command(version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = LOG_ENV, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Convert a props file to JSON
    Convert {
        /// Input file, stdin when absent
        infile: Option<PathBuf>,
        /// Output file, stdout when absent
        outfile: Option<PathBuf>,
        /// Pretty-print with sorted keys
        #[arg(short, long)]
        verbose: bool,
    },
    /// Rewrite a single fuzzy regex and show its version checks
    Regex {
        /// The regex pattern, without the surrounding slashes
        pattern: String,
        /// Show AST debug output
        #[arg(short, long)]
        debug: bool,
    },
}
