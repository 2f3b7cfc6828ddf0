//! Trace parsing and the call tree data model.
//!
//! This module handles:
//! - Decoding raw indentation-encoded trace lines
//! - Building the call site forest
//! - Aggregating unique addresses per module

pub mod call_tree;
pub mod line;

// Re-export main types
pub use call_tree::{parse_trace, CallSite, ModuleAddresses, ParsedTrace, SymbolInfo, SymbolTable};
pub use line::{decode_line, DecodedLine};
