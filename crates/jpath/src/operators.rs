//! Predicate comparison semantics.
//!
//! Keyword operators (`eq ne lt le gt ge`) compare exactly one scalar with one
//! scalar. Symbolic operators compare sets: `=` holds when any pair is deeply
//! equal, `!=` when any pair differs. The symbolic relational operators are
//! recognised by the grammar but never hold.
use crate::ast::ComparisonOperator;
use crate::datasource::JsonNode;
use itertools::Itertools;
use jxt_tree::Scalar;
use std::cmp::Ordering;

/// One resolved operand value: a node from a tree or a literal.
#[derive(Debug, Clone)]
pub enum Operand<N> {
    Node(N),
    Literal(Scalar),
}

impl<'a, N: JsonNode<'a>> Operand<N> {
    fn scalar<'s>(&'s self) -> Option<&'s Scalar>
    where
        'a: 's,
    {
        match self {
            Operand::Node(node) => node.scalar(),
            Operand::Literal(value) => Some(value),
        }
    }

    fn deep_eq(&self, other: &Operand<N>) -> bool {
        match (self, other) {
            (Operand::Node(a), Operand::Node(b)) => a.deep_eq(b),
            (Operand::Literal(a), Operand::Literal(b)) => a == b,
            (Operand::Node(node), Operand::Literal(value))
            | (Operand::Literal(value), Operand::Node(node)) => node.scalar() == Some(value),
        }
    }
}

pub fn compare<'a, N: JsonNode<'a>>(
    left: &[Operand<N>],
    operator: ComparisonOperator,
    right: &[Operand<N>],
) -> bool {
    if operator.is_keyword() {
        return match (left, right) {
            ([l], [r]) => match (l.scalar(), r.scalar()) {
                (Some(a), Some(b)) => compare_scalars(a, operator, b),
                _ => false,
            },
            _ => false,
        };
    }
    match operator {
        ComparisonOperator::Equals => left
            .iter()
            .cartesian_product(right)
            .any(|(l, r)| l.deep_eq(r)),
        ComparisonOperator::NotEquals => left
            .iter()
            .cartesian_product(right)
            .any(|(l, r)| !l.deep_eq(r)),
        _ => false,
    }
}

/// Strings order lexicographically and numbers by value; any other pairing is
/// unordered. Equality is by tag and value, without numeric widening.
fn order(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::String(x), Scalar::String(y)) => Some(x.cmp(y)),
        _ if a.is_numeric() && b.is_numeric() => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

fn compare_scalars(a: &Scalar, operator: ComparisonOperator, b: &Scalar) -> bool {
    match operator {
        ComparisonOperator::Eq => a == b,
        ComparisonOperator::Ne => a != b,
        ComparisonOperator::Lt => order(a, b) == Some(Ordering::Less),
        ComparisonOperator::Le => matches!(order(a, b), Some(Ordering::Less | Ordering::Equal)),
        ComparisonOperator::Gt => order(a, b) == Some(Ordering::Greater),
        ComparisonOperator::Ge => matches!(order(a, b), Some(Ordering::Greater | Ordering::Equal)),
        _ => false,
    }
}
