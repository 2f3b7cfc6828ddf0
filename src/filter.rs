//! Exclusion filters for modules, symbols, and source locations.
//!
//! Patterns are regular expressions matched anchored at the start of the
//! string, compiled once when the filters are built. The filters travel as an
//! explicit value through the pipeline; nothing in here is global state.

use crate::parser::ParsedTrace;
use crate::utils::error::FilterError;
use log::debug;
use regex::Regex;

/// Compiled exclusion filters
#[derive(Debug, Default)]
pub struct TraceFilters {
    excluded_symbols: Vec<Regex>,
    excluded_modules: Vec<Regex>,
}

impl TraceFilters {
    /// Compile the exclusion pattern lists.
    ///
    /// **Public** - built once from CLI arguments, before any parsing
    ///
    /// # Errors
    /// * `FilterError::InvalidPattern` - a pattern fails to compile
    pub fn new(
        symbol_patterns: &[String],
        module_patterns: &[String],
    ) -> Result<Self, FilterError> {
        Ok(Self {
            excluded_symbols: compile_anchored(symbol_patterns)?,
            excluded_modules: compile_anchored(module_patterns)?,
        })
    }

    /// True if any module pattern matches the start of `module`
    pub fn is_module_excluded(&self, module: &str) -> bool {
        self.excluded_modules.iter().any(|p| p.is_match(module))
    }

    /// True if any symbol pattern matches the start of the symbol name or
    /// of the source location
    pub fn is_symbol_excluded(&self, symbol: &str, source_location: &str) -> bool {
        self.excluded_symbols
            .iter()
            .any(|p| p.is_match(symbol) || p.is_match(source_location))
    }
}

/// Anchor each pattern at the start of the string and compile it
fn compile_anchored(patterns: &[String]) -> Result<Vec<Regex>, FilterError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                FilterError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })
        })
        .collect()
}

/// Remove excluded modules from the forest roots and the address map.
///
/// **Public** - runs after parsing, before symbolization
///
/// Root call sites whose module matches an exclusion pattern are dropped
/// together with their whole subtree, and the excluded modules' address
/// batches are never sent to the symbolizer. Non-root call sites that
/// reference an excluded module are skipped at render time instead.
pub fn apply_module_filters(trace: &mut ParsedTrace, filters: &TraceFilters) {
    let roots_before = trace.roots.len();
    trace
        .roots
        .retain(|site| !filters.is_module_excluded(&site.module));
    trace
        .addresses_by_module
        .retain(|module, _| !filters.is_module_excluded(module));

    debug!(
        "module filters removed {} of {} root call sites",
        roots_before - trace.roots.len(),
        roots_before
    );
}
