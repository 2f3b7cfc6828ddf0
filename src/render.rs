//! Render the symbolized call tree as indented text.
//!
//! Each surviving call site prints as `symbol (source_location)`, indented
//! two spaces per depth level beyond the root, in original left-to-right
//! order.

use crate::filter::TraceFilters;
use crate::parser::{CallSite, ParsedTrace};
use crate::utils::config::INDENT_STEP;
use crate::utils::error::RenderError;
use std::io::Write;

/// Render every surviving call site into `out`.
///
/// **Public** - main entry point for rendering
///
/// A node whose module, symbol, or source location matches an exclusion
/// pattern is skipped together with its entire subtree. With a nonzero
/// `depth_limit`, descent stops once a node reaches the limit; 0 renders
/// arbitrarily deep.
///
/// # Errors
/// * `RenderError::MissingSymbol` - a surviving call site has no symbol
///   table entry, meaning parsing and symbolization disagree
/// * `RenderError::Io` - the output writer failed
pub fn render_call_tree(
    trace: &ParsedTrace,
    depth_limit: usize,
    filters: &TraceFilters,
    out: &mut impl Write,
) -> Result<(), RenderError> {
    render_call_sites(trace, &trace.roots, depth_limit, filters, out)
}

fn render_call_sites(
    trace: &ParsedTrace,
    sites: &[CallSite],
    depth_limit: usize,
    filters: &TraceFilters,
    out: &mut impl Write,
) -> Result<(), RenderError> {
    for site in sites {
        if depth_limit > 0 && site.depth > depth_limit {
            continue;
        }

        // Inner frames can reference modules that were excluded before
        // symbolization; their addresses were never resolved.
        if filters.is_module_excluded(&site.module) {
            continue;
        }

        let info = trace
            .symbol_table
            .get(&site.module)
            .and_then(|entries| entries.get(&site.address))
            .ok_or_else(|| RenderError::MissingSymbol {
                module: site.module.clone(),
                address: site.address.clone(),
            })?;

        if filters.is_symbol_excluded(&info.symbol, &info.source_location) {
            continue;
        }

        let indent = (site.depth - 1) * INDENT_STEP;
        writeln!(
            out,
            "{:indent$}{} ({})",
            "", info.symbol, info.source_location
        )?;

        if depth_limit == 0 || site.depth < depth_limit {
            render_call_sites(trace, &site.children, depth_limit, filters, out)?;
        }
    }

    Ok(())
}
