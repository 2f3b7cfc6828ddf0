//! Batch resolution of per-module address sets into the symbol table.
//!
//! The external symbolizer is modeled as a synchronous request/response
//! batch service behind the [`Symbolizer`] trait: an ordered address batch
//! goes in, an equally long ordered list of resolved symbols comes out. The
//! trait seam keeps response demultiplexing out of the tree logic and makes
//! the gateway testable with a fake implementation.

use crate::parser::{ParsedTrace, SymbolInfo};
use crate::utils::error::SymbolizeError;
use log::{debug, info};
use std::collections::BTreeMap;

/// Address-batch resolution service
pub trait Symbolizer {
    /// Resolve every address in `addresses` against `module`.
    ///
    /// Implementations must return one entry per requested address, in
    /// request order.
    fn resolve(
        &self,
        module: &str,
        addresses: &[String],
    ) -> Result<Vec<SymbolInfo>, SymbolizeError>;
}

/// Resolve every module's address batch and populate the symbol table.
///
/// **Public** - main entry point for symbolization
///
/// One `resolve` call is made per module, strictly sequentially. The request
/// and the response are zipped off the same address snapshot, so the i-th
/// response entry always lands on the i-th requested address.
///
/// # Errors
/// * `SymbolizeError::ResponseUnderflow` - an implementation answered fewer
///   addresses than requested; partial results are never kept
/// * any other `SymbolizeError` propagated from the implementation
pub fn resolve_symbols(
    trace: &mut ParsedTrace,
    symbolizer: &impl Symbolizer,
) -> Result<(), SymbolizeError> {
    for (module, addresses) in &trace.addresses_by_module {
        let batch: Vec<String> = addresses.iter().cloned().collect();
        info!("Resolving {} unique addresses in {}", batch.len(), module);

        let resolved = symbolizer.resolve(module, &batch)?;
        if resolved.len() < batch.len() {
            return Err(SymbolizeError::ResponseUnderflow {
                module: module.clone(),
                expected: batch.len(),
                got: resolved.len(),
            });
        }

        let entries: BTreeMap<String, SymbolInfo> =
            batch.into_iter().zip(resolved).collect();
        debug!("{}: {} symbol table entries", module, entries.len());
        trace.symbol_table.insert(module.clone(), entries);
    }

    Ok(())
}
