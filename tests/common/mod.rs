#![allow(dead_code)]

pub mod fixtures;

use jxt::tree::{Document, Node};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The text of each node: raw for strings, JSON for everything else.
pub fn texts(nodes: &[Node<'_>]) -> Vec<String> {
    nodes.iter().map(|n| n.to_text()).collect()
}

/// Every node below `node` in pre-order, collected by walking children.
pub fn walk_descendants<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    for child in node.children() {
        out.push(child);
        out.extend(walk_descendants(child));
    }
    out
}

/// Every node of `doc`, root first.
pub fn all_nodes(doc: &Document) -> Vec<Node<'_>> {
    let mut out = vec![doc.root()];
    out.extend(walk_descendants(doc.root()));
    out
}
