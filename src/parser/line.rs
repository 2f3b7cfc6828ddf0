//! Decode one raw trace line into depth, address, and module.
//!
//! The trace format encodes nesting as leading whitespace, two spaces per
//! level: `<indentation><hex-address> (<module-path>)`.

use crate::utils::config::INDENT_STEP;
use crate::utils::error::ParseError;

/// One decoded trace line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// Nesting depth, starting at 1 for unindented lines
    pub depth: usize,

    /// Instruction address, kept as hex text
    pub address: String,

    /// Binary/object file the address belongs to
    pub module: String,
}

/// Decode a single trace line.
///
/// **Public** - used by the call tree builder
///
/// # Arguments
/// * `line` - Raw line content, without trailing newline
/// * `line_no` - 1-based line number, used for diagnostics
///
/// # Returns
/// The decoded depth, address, and module
///
/// # Errors
/// * `ParseError::MissingSeparator` - no space between address and module
pub fn decode_line(line: &str, line_no: usize) -> Result<DecodedLine, ParseError> {
    let stripped = line.trim_start();
    let indentation = line.len() - stripped.len();
    let depth = 1 + indentation / INDENT_STEP;

    let (address, rest) =
        stripped
            .split_once(' ')
            .ok_or_else(|| ParseError::MissingSeparator {
                line: line_no,
                content: line.to_string(),
            })?;
    let module = rest.trim().trim_matches(|c| c == '(' || c == ')');

    Ok(DecodedLine {
        depth,
        address: address.to_string(),
        module: module.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_unindented_line() {
        let line = decode_line("0x1234 (libfoo.so)", 1).unwrap();
        assert_eq!(line.depth, 1);
        assert_eq!(line.address, "0x1234");
        assert_eq!(line.module, "libfoo.so");
    }

    #[test]
    fn test_decode_depth_per_two_spaces() {
        assert_eq!(decode_line("0xAA (m)", 1).unwrap().depth, 1);
        assert_eq!(decode_line("  0xAA (m)", 1).unwrap().depth, 2);
        assert_eq!(decode_line("    0xAA (m)", 1).unwrap().depth, 3);
    }

    #[test]
    fn test_decode_odd_indentation_rounds_down() {
        assert_eq!(decode_line(" 0xAA (m)", 1).unwrap().depth, 1);
        assert_eq!(decode_line("   0xAA (m)", 1).unwrap().depth, 2);
    }

    #[test]
    fn test_decode_trims_parens_and_whitespace() {
        let line = decode_line("0xFF  (/usr/lib/libc.so) ", 1).unwrap();
        assert_eq!(line.address, "0xFF");
        assert_eq!(line.module, "/usr/lib/libc.so");
    }

    #[test]
    fn test_decode_missing_separator() {
        let err = decode_line("0x1234", 7).unwrap_err();
        match err {
            ParseError::MissingSeparator { line, content } => {
                assert_eq!(line, 7);
                assert_eq!(content, "0x1234");
            }
        }
    }
}
