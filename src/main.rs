//! Functrace Symbolize CLI
//!
//! Symbolizes the output of a process built with function instrumentation:
//! reads an indentation-encoded trace of instruction addresses and prints
//! the call tree with addresses replaced by symbol name and source location.
//!
//! The symbolizer executable (by default `llvm-symbolizer`) must be
//! reachable through PATH.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use functrace_symbolize::commands::{execute_symbolize, validate_args, SymbolizeArgs};
use functrace_symbolize::symbolizer::LlvmSymbolizer;

/// Symbolize a function call trace captured from an instrumented process
#[derive(Parser, Debug)]
#[command(name = "functrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Text file containing the raw function trace
    #[arg(short, long)]
    input: PathBuf,

    /// Depth at which to symbolize the trace. 1 = roots only, 0 = arbitrarily deep
    #[arg(short, long, default_value_t = 0)]
    depth: usize,

    /// Pattern matching symbols to omit from the output; child calls are
    /// omitted too. Repeatable
    #[arg(long = "exclude-symbol", value_name = "PATTERN")]
    exclude_symbol: Vec<String>,

    /// Pattern matching module names (for example .so files) to omit from
    /// the output. Repeatable
    #[arg(long = "exclude-module", value_name = "PATTERN")]
    exclude_module: Vec<String>,

    /// Symbolizer executable to run instead of the default llvm-symbolizer
    #[arg(long, value_name = "PATH")]
    symbolizer: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = SymbolizeArgs {
        input: cli.input,
        depth: cli.depth,
        exclude_symbols: cli.exclude_symbol,
        exclude_modules: cli.exclude_module,
        symbolizer: cli
            .symbolizer
            .unwrap_or_else(LlvmSymbolizer::default_executable),
    };

    // Validate args first
    validate_args(&args)?;

    // Execute symbolization
    execute_symbolize(args)
}
