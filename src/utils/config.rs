//! Configuration and constants for the CLI.

use std::time::Duration;

/// How long to wait for a symbolizer response before killing the child
pub const DEFAULT_SYMBOLIZER_TIMEOUT: Duration = Duration::from_secs(60);

/// Default symbolizer executable, resolved through PATH
pub const DEFAULT_SYMBOLIZER: &str = "llvm-symbolizer";

/// Indentation spaces per nesting level in the trace format
pub const INDENT_STEP: usize = 2;
