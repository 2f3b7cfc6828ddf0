use functrace_symbolize::parser::{decode_line, parse_trace};
use functrace_symbolize::utils::error::ParseError;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_trace_builds_forest_and_address_sets() {
    let trace = parse_trace("0xAA (mod1)\n  0xBB (mod1)\n0xCC (mod2)\n").unwrap();

    assert_eq!(trace.roots.len(), 2);
    assert_eq!(trace.roots[0].address, "0xAA");
    assert_eq!(trace.roots[0].children.len(), 1);
    assert_eq!(trace.roots[0].children[0].address, "0xBB");
    assert_eq!(trace.roots[1].address, "0xCC");

    let mod1: Vec<&str> = trace.addresses_by_module["mod1"]
        .iter()
        .map(|a| a.as_str())
        .collect();
    assert_eq!(mod1, ["0xAA", "0xBB"]);

    let mod2: Vec<&str> = trace.addresses_by_module["mod2"]
        .iter()
        .map(|a| a.as_str())
        .collect();
    assert_eq!(mod2, ["0xCC"]);
}

#[test]
fn test_parse_trace_depth_strictly_increases_into_children() {
    let trace = parse_trace("0xA (m)\n  0xB (m)\n    0xC (m)\n  0xD (m)\n").unwrap();

    let root = &trace.roots[0];
    assert_eq!(root.depth, 1);
    for child in &root.children {
        assert!(child.depth > root.depth);
        for grandchild in &child.children {
            assert!(grandchild.depth > child.depth);
        }
    }
    assert_eq!(root.children[0].depth, root.children[1].depth);
}

#[test]
fn test_decode_line_matches_indentation_step() {
    for level in 0..5 {
        let line = format!("{}0xAB (m)", " ".repeat(level * 2));
        assert_eq!(decode_line(&line, 1).unwrap().depth, level + 1);
    }
}

#[test]
fn test_parse_trace_rejects_line_without_separator() {
    let err = parse_trace("0xAA (mod1)\nnoseparator\n").unwrap_err();
    match err {
        ParseError::MissingSeparator { line, content } => {
            assert_eq!(line, 2);
            assert_eq!(content, "noseparator");
        }
    }
}
