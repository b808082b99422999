//! The evaluation engine for executing a compiled [`Path`] against a generic
//! [`JsonNode`].

use crate::ast::{Path, Predicate, Segment, Step};
use crate::datasource::JsonNode;
use crate::operators::{self, Operand};
use crate::{axes, parser};
use jxt_tree::{NodeType, Scalar};
use regex::Regex;
use std::sync::LazyLock;

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\-\+]?\d+$").expect("BUG: invalid INTEGER_RE regex literal"));

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\-\+]?\d*\.?\d+([eE][-+]?\d+)?$").expect("BUG: invalid NUMBER_RE regex literal")
});

/// Evaluates `path` from `start`. Absolute paths begin at the root of
/// `start`'s document. `variables`, when given, is an object whose members are
/// reachable from predicates as `$name`.
///
/// Results are in selection order and are not de-duplicated.
pub fn evaluate<'a, N: JsonNode<'a>>(path: &Path, start: N, variables: Option<N>) -> Vec<N> {
    let context = if path.is_absolute { start.root() } else { start };
    let mut evaluator = Evaluator {
        variables,
        selected: Vec::new(),
    };
    evaluator.walk(&path.steps, context);
    evaluator.selected
}

/// Compiles `text` leniently and evaluates it.
pub fn select<'a, N: JsonNode<'a>>(text: &str, start: N, variables: Option<N>) -> Vec<N> {
    evaluate(&parser::compile(text), start, variables)
}

struct Evaluator<N> {
    variables: Option<N>,
    selected: Vec<N>,
}

impl<'a, N: JsonNode<'a>> Evaluator<N> {
    /// Continues with `rest` from `node` if it passes `predicate`.
    fn visit(&mut self, predicate: Option<&Predicate>, rest: &[Step], node: N) {
        if let Some(predicate) = predicate {
            let passed = self.check(predicate, node);
            log::trace!("Predicate {} on {:?}: {}", predicate, node, passed);
            if !passed {
                return;
            }
        }
        self.walk(rest, node);
    }

    fn walk(&mut self, steps: &[Step], context: N) {
        let Some((step, rest)) = steps.split_first() else {
            self.selected.push(context);
            return;
        };
        log::trace!("Step '{}' at {:?}", step, context);
        let predicate = step.predicate.as_ref();

        match &step.segment {
            Segment::Current => {
                for node in axes::collect(&step.axis, context) {
                    self.visit(predicate, rest, node);
                }
            }
            Segment::Parent => {
                if let Some(parent) = context.parent() {
                    self.visit(predicate, rest, parent);
                }
            }
            Segment::Wildcard => {
                for child in context.children() {
                    self.visit(predicate, rest, child);
                }
            }
            Segment::Descend => match rest.split_first() {
                Some((next, _)) if next.segment == Segment::Inert => {}
                Some((next, after)) => {
                    let mut found = Vec::new();
                    search_named(context, next.segment.as_str(), &mut found);
                    for node in found {
                        self.visit(next.predicate.as_ref(), after, node);
                    }
                }
                None => self.visit(predicate, rest, context),
            },
            Segment::Name(name) => {
                for node in axes::collect(&step.axis, context) {
                    if let Some(child) = named_child(node, name) {
                        self.visit(predicate, rest, child);
                    }
                }
            }
            Segment::Inert => {}
        }
    }

    fn check(&self, predicate: &Predicate, context: N) -> bool {
        let left = self.resolve_operand(&predicate.left, context);
        let right = self.resolve_operand(&predicate.right, context);
        let result = operators::compare(&left, predicate.operator, &right);
        result != predicate.negated
    }

    fn resolve_operand(&self, text: &str, context: N) -> Vec<Operand<N>> {
        if let Some(name) = text.strip_prefix('$') {
            return self
                .variables
                .and_then(|vars| vars.child_by_name(name))
                .map(Operand::Node)
                .into_iter()
                .collect();
        }
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            let literal = &text[1..text.len() - 1];
            return vec![Operand::Literal(Scalar::String(literal.to_string()))];
        }
        if INTEGER_RE.is_match(text) {
            if let Some(value) = Scalar::parse_integer(text) {
                return vec![Operand::Literal(value)];
            }
        } else if NUMBER_RE.is_match(text) {
            if let Ok(value) = text.parse::<f32>() {
                return vec![Operand::Literal(Scalar::Float(value))];
            }
        }
        let path = parser::compile(text);
        let start = if path.is_absolute { context.root() } else { context };
        let mut nested = Evaluator {
            variables: self.variables,
            selected: Vec::new(),
        };
        nested.walk(&path.steps, start);
        nested.selected.into_iter().map(Operand::Node).collect()
    }
}

/// A field by name, or by position when `segment` is an integer. Arrays only
/// accept integer positions.
fn named_child<'a, N: JsonNode<'a>>(node: N, segment: &str) -> Option<N> {
    let index = || {
        INTEGER_RE
            .is_match(segment)
            .then(|| segment.parse::<usize>().ok())
            .flatten()
    };
    match node.node_type() {
        NodeType::Object if INTEGER_RE.is_match(segment) => node.child_at(index()?),
        NodeType::Object => node.child_by_name(segment),
        NodeType::Array => node.child_at(index()?),
        NodeType::Value => None,
    }
}

/// Pre-order search of `node`'s subtree (itself included) for objects with a
/// member called `name`, collecting the member values.
fn search_named<'a, N: JsonNode<'a>>(node: N, name: &str, found: &mut Vec<N>) {
    match node.node_type() {
        NodeType::Object | NodeType::Array => {
            if let Some(member) = node.child_by_name(name) {
                found.push(member);
            }
            for child in node.children() {
                search_named(child, name, found);
            }
        }
        NodeType::Value => {}
    }
}
