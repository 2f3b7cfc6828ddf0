//! Address-to-symbol resolution through an external symbolizer process.
//!
//! This module handles:
//! - The batch request/response seam ([`gateway::Symbolizer`])
//! - Driving one resolution call per module and assembling the symbol table
//! - The subprocess adapter speaking the llvm-symbolizer contract

pub mod gateway;
pub mod process;

// Re-export main types
pub use gateway::{resolve_symbols, Symbolizer};
pub use process::LlvmSymbolizer;
