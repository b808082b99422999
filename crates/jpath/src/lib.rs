//! A JSON-native path language in the spirit of XPath location paths.
//!
//! Paths are slash-separated steps, each an optional axis, a segment and an
//! optional predicate: `/store/book/*[price lt 10]/author`,
//! `//title`, `descendant::price`, `*[not(category = "fiction")]`.
//! Compilation is lenient; evaluation never fails and returns the selected
//! nodes in order.

pub mod ast;
pub mod axes;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod operators;
mod parser;

// --- Public API ---
pub use ast::{Axis, ComparisonOperator, Path, Predicate, Segment, Step};
pub use datasource::JsonNode;
pub use engine::{evaluate, select};
pub use error::JPathError;
pub use parser::{compile, compile_strict};

#[cfg(test)]
mod tests {
    use super::*;
    use jxt_tree::parse_str;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_compile_and_evaluate() {
        init_logger();
        let doc = parse_str(r#"{"customer": {"orders": [{"id": "A"}, {"id": "B"}]}}"#).unwrap();
        let path = compile("/customer/orders/1/id");
        let result = evaluate(&path, doc.root(), None);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_text(), "B");
    }

    #[test]
    fn test_compiled_path_is_reusable() {
        init_logger();
        let path = compile("*[id ne \"A\"]/id");
        let first = parse_str(r#"[{"id": "A"}, {"id": "C"}]"#).unwrap();
        let second = parse_str(r#"{"x": {"id": "D"}}"#).unwrap();
        let texts = |doc: &jxt_tree::Document| -> Vec<String> {
            evaluate(&path, doc.root(), None).iter().map(|n| n.to_text()).collect()
        };
        assert_eq!(texts(&first), vec!["C"]);
        assert_eq!(texts(&second), vec!["D"]);
    }

    #[test]
    fn test_axis_duality() {
        init_logger();
        let doc = parse_str(r#"{"a": {"b": [1, {"c": 2}], "d": null}}"#).unwrap();
        let all = select("descendant-or-self::.", doc.root(), None);
        for node in all {
            let children = select("child::.", node, None);
            assert_eq!(children, select("child::*", node, None));
            for child in children {
                assert_eq!(select("parent::.", child, None), vec![node]);
            }
        }
    }
}
