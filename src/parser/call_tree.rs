//! Build a call site forest from decoded trace lines.
//!
//! Depth is the only structural signal in the trace format; there is no
//! explicit end-of-subtree marker. A call site owns every following line
//! whose depth is strictly greater than its own, and a line at depth less
//! than or equal to the current call site closes it (and any deeper open
//! ancestors) implicitly.

use super::line::{decode_line, DecodedLine};
use crate::utils::error::ParseError;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// One recorded frame in the trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Nesting depth, starting at 1
    pub depth: usize,

    /// Instruction address, kept as hex text
    pub address: String,

    /// Binary/object file the address belongs to
    pub module: String,

    /// Child calls in input order
    pub children: Vec<CallSite>,
}

/// One resolved address: symbol name plus source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub symbol: String,
    pub source_location: String,
}

/// Unique addresses recorded per module
pub type ModuleAddresses = BTreeMap<String, BTreeSet<String>>;

/// Resolved symbol information per module, per address
pub type SymbolTable = BTreeMap<String, BTreeMap<String, SymbolInfo>>;

/// Parsed trace data (internal representation)
///
/// The address sets determine what must be requested from the symbolizer.
/// The symbol table starts empty and is populated by the symbolizer gateway,
/// keyed identically to `addresses_by_module` after module filtering.
#[derive(Debug, Default)]
pub struct ParsedTrace {
    /// Root call sites in input order
    pub roots: Vec<CallSite>,

    /// Unique addresses recorded per module during tree construction
    pub addresses_by_module: ModuleAddresses,

    /// Resolved symbols, empty until symbolization runs
    pub symbol_table: SymbolTable,
}

/// Parse a raw trace into a forest of call sites.
///
/// **Public** - main entry point for parsing
///
/// Decodes every line once, then builds the forest with a cursor-based
/// recursive descent over the decoded sequence. Every (module, address) pair
/// visited is recorded into the per-module unique address sets as a side
/// effect of construction.
///
/// # Arguments
/// * `input` - Full trace file content
///
/// # Returns
/// The call site forest plus the per-module address sets
///
/// # Errors
/// * `ParseError::MissingSeparator` - a line cannot be decoded
pub fn parse_trace(input: &str) -> Result<ParsedTrace, ParseError> {
    let decoded = input
        .lines()
        .enumerate()
        .map(|(i, line)| decode_line(line, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let mut trace = ParsedTrace::default();
    let mut index = 0;
    while index < decoded.len() {
        let (root, next) = build_call_site(&decoded, index, &mut trace.addresses_by_module);
        trace.roots.push(root);
        index = next;
    }

    debug!(
        "parsed {} root call sites across {} modules",
        trace.roots.len(),
        trace.addresses_by_module.len()
    );

    Ok(trace)
}

/// Build one call site starting at `start`, consuming its subtree.
///
/// **Private** - recursive worker for parse_trace
///
/// Returns the finished call site and the cursor position of the first line
/// it does not own: the first line at depth <= its own, or end of input.
fn build_call_site(
    lines: &[DecodedLine],
    start: usize,
    addresses: &mut ModuleAddresses,
) -> (CallSite, usize) {
    let line = &lines[start];
    addresses
        .entry(line.module.clone())
        .or_default()
        .insert(line.address.clone());

    let mut site = CallSite {
        depth: line.depth,
        address: line.address.clone(),
        module: line.module.clone(),
        children: Vec::new(),
    };

    let mut index = start + 1;
    while index < lines.len() && lines[index].depth > site.depth {
        let (child, next) = build_call_site(lines, index, addresses);
        site.children.push(child);
        index = next;
    }

    (site, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn module_addresses(trace: &ParsedTrace, module: &str) -> Vec<String> {
        trace.addresses_by_module[module]
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn test_parse_two_roots_with_nested_child() {
        let trace = parse_trace("0xAA (mod1)\n  0xBB (mod1)\n0xCC (mod2)\n").unwrap();

        assert_eq!(trace.roots.len(), 2);

        let first = &trace.roots[0];
        assert_eq!(first.depth, 1);
        assert_eq!(first.address, "0xAA");
        assert_eq!(first.module, "mod1");
        assert_eq!(first.children.len(), 1);
        assert_eq!(first.children[0].depth, 2);
        assert_eq!(first.children[0].address, "0xBB");

        let second = &trace.roots[1];
        assert_eq!(second.depth, 1);
        assert_eq!(second.address, "0xCC");
        assert_eq!(second.module, "mod2");
        assert!(second.children.is_empty());

        assert_eq!(module_addresses(&trace, "mod1"), ["0xAA", "0xBB"]);
        assert_eq!(module_addresses(&trace, "mod2"), ["0xCC"]);
    }

    #[test]
    fn test_parse_empty_input() {
        let trace = parse_trace("").unwrap();
        assert!(trace.roots.is_empty());
        assert!(trace.addresses_by_module.is_empty());
    }

    #[test]
    fn test_parse_siblings_share_parent() {
        let trace = parse_trace("0xA (m)\n  0xB (m)\n  0xC (m)\n").unwrap();
        assert_eq!(trace.roots.len(), 1);
        assert_eq!(trace.roots[0].children.len(), 2);
        assert_eq!(trace.roots[0].children[0].address, "0xB");
        assert_eq!(trace.roots[0].children[1].address, "0xC");
    }

    #[test]
    fn test_parse_shallow_line_closes_all_open_ancestors() {
        let trace = parse_trace("0xA (m)\n  0xB (m)\n    0xC (m)\n0xD (m)\n").unwrap();
        assert_eq!(trace.roots.len(), 2);
        assert_eq!(trace.roots[0].children.len(), 1);
        assert_eq!(trace.roots[0].children[0].children.len(), 1);
        assert_eq!(trace.roots[1].address, "0xD");
        assert!(trace.roots[1].children.is_empty());
    }

    #[test]
    fn test_parse_depth_jump_greater_than_one_level() {
        let trace = parse_trace("0xA (m)\n      0xB (m)\n  0xC (m)\n").unwrap();
        let root = &trace.roots[0];
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].depth, 4);
        assert_eq!(root.children[1].depth, 2);
    }

    #[test]
    fn test_parse_first_line_deeper_than_root_is_accepted() {
        let trace = parse_trace("  0xA (m)\n").unwrap();
        assert_eq!(trace.roots.len(), 1);
        assert_eq!(trace.roots[0].depth, 2);
    }

    #[test]
    fn test_parse_duplicate_address_tracked_once_per_module() {
        let trace = parse_trace("0xA (m)\n0xA (m)\n0xA (other)\n").unwrap();
        assert_eq!(trace.roots.len(), 3);
        assert_eq!(module_addresses(&trace, "m"), ["0xA"]);
        assert_eq!(module_addresses(&trace, "other"), ["0xA"]);
    }

    #[test]
    fn test_parse_bad_line_reports_position() {
        let err = parse_trace("0xA (m)\nbroken\n").unwrap_err();
        match err {
            ParseError::MissingSeparator { line, .. } => assert_eq!(line, 2),
        }
    }
}
