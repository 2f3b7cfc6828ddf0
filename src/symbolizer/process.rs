//! Subprocess adapter for `llvm-symbolizer`-compatible executables.
//!
//! One child process per module: the module's address batch is written to
//! stdin up front, stdout is drained to EOF under a timeout, and the
//! blank-line-delimited response segments are mapped back onto request
//! order.

use super::gateway::Symbolizer;
use crate::parser::SymbolInfo;
use crate::utils::config::{DEFAULT_SYMBOLIZER, DEFAULT_SYMBOLIZER_TIMEOUT};
use crate::utils::error::SymbolizeError;
use log::debug;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Subprocess-backed symbolizer
pub struct LlvmSymbolizer {
    executable: PathBuf,
    timeout: Duration,
}

impl LlvmSymbolizer {
    /// Create an adapter running the given executable
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: DEFAULT_SYMBOLIZER_TIMEOUT,
        }
    }

    /// Override the response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Default executable name, resolved through PATH
    pub fn default_executable() -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(format!("{DEFAULT_SYMBOLIZER}.exe"))
        } else {
            PathBuf::from(DEFAULT_SYMBOLIZER)
        }
    }

    /// Run one child process to completion and return its stdout.
    ///
    /// **Private** - process plumbing for resolve
    ///
    /// Stdin is fed from a writer thread and stdout drained from a reader
    /// thread, so a child that interleaves reading and writing cannot
    /// deadlock against a full pipe. The child is killed if the full
    /// response does not arrive within the timeout.
    fn run(&self, module: &str, request: String) -> Result<String, SymbolizeError> {
        debug!(
            "launching {} for module {}",
            self.executable.display(),
            module
        );

        let mut child = Command::new(&self.executable)
            .arg(format!("-obj={module}"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SymbolizeError::Launch {
                executable: self.executable.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().expect("stdin is piped");
        let writer = thread::spawn(move || {
            // A child that exits before consuming its input breaks the pipe;
            // that surfaces through the exit status check, not here.
            let _ = stdin.write_all(request.as_bytes());
        });

        let mut stdout = child.stdout.take().expect("stdout is piped");
        let (tx, rx) = mpsc::channel();
        let reader = thread::spawn(move || {
            let mut buffer = String::new();
            let result = stdout.read_to_string(&mut buffer).map(|_| buffer);
            let _ = tx.send(result);
        });

        let output = match rx.recv_timeout(self.timeout) {
            Ok(result) => result.map_err(|source| SymbolizeError::Io {
                module: module.to_string(),
                source,
            })?,
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SymbolizeError::Timeout {
                    module: module.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        let _ = reader.join();
        let _ = writer.join();

        let status = child.wait().map_err(|source| SymbolizeError::Io {
            module: module.to_string(),
            source,
        })?;
        if !status.success() {
            return Err(SymbolizeError::Failed {
                module: module.to_string(),
                status,
            });
        }

        Ok(output)
    }
}

impl Symbolizer for LlvmSymbolizer {
    fn resolve(
        &self,
        module: &str,
        addresses: &[String],
    ) -> Result<Vec<SymbolInfo>, SymbolizeError> {
        let mut request = addresses.join("\n");
        request.push('\n');

        let output = self.run(module, request)?;
        parse_response(&output, addresses.len(), module)
    }
}

/// Split a symbolizer response into per-address symbol records.
///
/// **Private** - response demultiplexing, one segment per requested address
///
/// For N requested addresses the response carries N variable-length
/// segments, each terminated by a blank line. A segment spans multiple
/// frames when the symbolizer expands inlining; only its last two lines are
/// kept, so the innermost frame wins.
///
/// # Errors
/// * `SymbolizeError::ResponseUnderflow` - the response ended before every
///   requested address had a segment
/// * `SymbolizeError::TruncatedSegment` - a segment has fewer than the two
///   symbol/source lines
fn parse_response(
    output: &str,
    expected: usize,
    module: &str,
) -> Result<Vec<SymbolInfo>, SymbolizeError> {
    let lines: Vec<&str> = output.lines().collect();
    let mut resolved = Vec::with_capacity(expected);
    let mut cursor = 0;

    for index in 0..expected {
        if cursor >= lines.len() {
            return Err(SymbolizeError::ResponseUnderflow {
                module: module.to_string(),
                expected,
                got: index,
            });
        }

        let start = cursor;
        let mut end = cursor;
        while end < lines.len() && !lines[end].trim().is_empty() {
            end += 1;
        }

        if end - start < 2 {
            return Err(SymbolizeError::TruncatedSegment {
                module: module.to_string(),
                index,
            });
        }

        resolved.push(SymbolInfo {
            symbol: lines[end - 2].to_string(),
            source_location: lines[end - 1].to_string(),
        });

        // Step over the blank terminator
        cursor = end + 1;
    }

    Ok(resolved)
}
