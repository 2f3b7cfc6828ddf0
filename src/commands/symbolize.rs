//! Symbolize command implementation.
//!
//! The symbolize command:
//! 1. Reads the trace file
//! 2. Parses it into a call site forest
//! 3. Applies module exclusion filters
//! 4. Resolves addresses through the external symbolizer
//! 5. Renders the symbolized call tree to stdout

use crate::filter::{apply_module_filters, TraceFilters};
use crate::parser::parse_trace;
use crate::render::render_call_tree;
use crate::symbolizer::{resolve_symbols, LlvmSymbolizer};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the symbolize command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SymbolizeArgs {
    /// Trace file to symbolize
    pub input: PathBuf,

    /// Maximum render depth, 0 = unbounded
    pub depth: usize,

    /// Anchored patterns excluding symbols and source locations
    pub exclude_symbols: Vec<String>,

    /// Anchored patterns excluding modules
    pub exclude_modules: Vec<String>,

    /// Symbolizer executable
    pub symbolizer: PathBuf,
}

impl Default for SymbolizeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            depth: 0,
            exclude_symbols: Vec::new(),
            exclude_modules: Vec::new(),
            symbolizer: LlvmSymbolizer::default_executable(),
        }
    }
}

/// Validate symbolize arguments
///
/// **Public** - called before execute_symbolize for early failure
pub fn validate_args(args: &SymbolizeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }

    if args.symbolizer.as_os_str().is_empty() {
        anyhow::bail!("symbolizer executable cannot be empty");
    }

    Ok(())
}

/// Execute the symbolize command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Symbolize command arguments
///
/// # Returns
/// Ok if the full pipeline ran and the tree was printed
///
/// # Errors
/// Any stage failure aborts the run before output is produced; there is no
/// partial-success mode. The tree is rendered into a buffer first so a
/// render failure cannot leave half a tree on stdout.
pub fn execute_symbolize(args: SymbolizeArgs) -> Result<()> {
    info!("Symbolizing trace: {}", args.input.display());

    // Step 1: Read input
    info!("Step 1/5: Reading trace file...");
    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read trace file {}", args.input.display()))?;

    // Step 2: Parse into a call site forest
    info!("Step 2/5: Parsing trace...");
    let mut trace = parse_trace(&input).context("Failed to parse trace")?;

    debug!(
        "Parsed {} root call sites across {} modules",
        trace.roots.len(),
        trace.addresses_by_module.len()
    );

    // Step 3: Apply module filters
    info!("Step 3/5: Filtering modules...");
    if !args.exclude_symbols.is_empty() {
        debug!("excluded symbol patterns: {:?}", args.exclude_symbols);
    }
    if !args.exclude_modules.is_empty() {
        debug!("excluded module patterns: {:?}", args.exclude_modules);
    }

    let filters = TraceFilters::new(&args.exclude_symbols, &args.exclude_modules)
        .context("Failed to compile exclusion patterns")?;
    apply_module_filters(&mut trace, &filters);

    // Step 4: Resolve addresses
    info!("Step 4/5: Running symbolizer...");
    let symbolizer = LlvmSymbolizer::new(&args.symbolizer);
    resolve_symbols(&mut trace, &symbolizer).context("Failed to symbolize addresses")?;

    // Step 5: Render
    info!("Step 5/5: Rendering call tree...");
    let mut rendered = Vec::new();
    render_call_tree(&trace, args.depth, &filters, &mut rendered)
        .context("Failed to render call tree")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (module, addresses) in &trace.addresses_by_module {
        writeln!(out, "{}: {} unique addresses", module, addresses.len())?;
    }
    writeln!(
        out,
        "Call tree with depth {} for {} root call sites",
        args.depth,
        trace.roots.len()
    )?;
    out.write_all(&rendered)?;
    out.flush()?;

    Ok(())
}
