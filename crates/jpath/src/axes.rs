//! Contains pure functions for collecting nodes along each axis.

use crate::ast::Axis;
use crate::datasource::JsonNode;

/// The nodes on `axis` relative to `node`, in axis order.
pub fn collect<'a, N: JsonNode<'a>>(axis: &Axis, node: N) -> Vec<N> {
    let mut results = Vec::new();
    match axis {
        Axis::Identity => results.push(node),
        Axis::Child => results.extend(node.children()),
        Axis::Parent => results.extend(node.parent()),
        Axis::Ancestor => collect_ancestor_nodes(node, &mut results),
        Axis::AncestorOrSelf => {
            results.push(node);
            collect_ancestor_nodes(node, &mut results);
        }
        Axis::Descendant => collect_descendant_nodes(node, &mut results),
        Axis::DescendantOrSelf => {
            results.push(node);
            collect_descendant_nodes(node, &mut results);
        }
        Axis::PrecedingSibling => collect_preceding_sibling_nodes(node, &mut results),
        Axis::FollowingSibling => collect_following_sibling_nodes(node, &mut results),
        Axis::Unknown(name) => log::debug!("Unknown axis '{}' selects nothing", name),
    }
    results
}

/// Nearest ancestor first.
pub fn collect_ancestor_nodes<'a, N: JsonNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(p) = current {
        results.push(p);
        current = p.parent();
    }
}

/// Pre-order, excluding `node` itself.
pub fn collect_descendant_nodes<'a, N: JsonNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        results.push(current);
        let first = stack.len();
        stack.extend(current.children());
        stack[first..].reverse();
    }
}

pub fn collect_following_sibling_nodes<'a, N: JsonNode<'a>>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        results.extend(parent.children().skip_while(|sibling| *sibling != node).skip(1));
    }
}

pub fn collect_preceding_sibling_nodes<'a, N: JsonNode<'a>>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        results.extend(parent.children().take_while(|sibling| *sibling != node));
    }
}
