//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while decoding trace lines
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: no space between address and module: {content:?}")]
    MissingSeparator { line: usize, content: String },
}

/// Errors that can occur while compiling exclusion filters
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid exclusion pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors that can occur while resolving addresses through the external symbolizer
#[derive(Error, Debug)]
pub enum SymbolizeError {
    #[error("failed to launch symbolizer {}: {source}", .executable.display())]
    Launch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symbolizer I/O failed for module {module}: {source}")]
    Io {
        module: String,
        #[source]
        source: std::io::Error,
    },

    #[error("symbolizer exited with {status} for module {module}")]
    Failed { module: String, status: ExitStatus },

    #[error("symbolizer produced no response for module {module} within {timeout:?}")]
    Timeout { module: String, timeout: Duration },

    #[error("symbolizer answered {got} of {expected} addresses for module {module}")]
    ResponseUnderflow {
        module: String,
        expected: usize,
        got: usize,
    },

    #[error("symbolizer response segment {index} for module {module} is missing its symbol/source lines")]
    TruncatedSegment { module: String, index: usize },
}

/// Errors that can occur while rendering the call tree
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no symbol table entry for address {address} in module {module}")]
    MissingSymbol { module: String, address: String },

    #[error("failed to write rendered tree: {0}")]
    Io(#[from] std::io::Error),
}
