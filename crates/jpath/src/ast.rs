//! Defines the compiled form of a path expression.
use std::fmt;

/// The axis of a step, deciding which nodes are considered relative to the
/// context node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Axis {
    /// No explicit axis (or `self`): the context node itself.
    Identity,
    Child,
    Parent,
    Ancestor,
    AncestorOrSelf,
    Descendant,
    DescendantOrSelf,
    PrecedingSibling,
    FollowingSibling,
    /// An axis name the language does not define. Selects nothing.
    Unknown(String),
}

impl Axis {
    pub fn from_name(name: &str) -> Axis {
        match name {
            "" | "self" => Axis::Identity,
            "child" => Axis::Child,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "preceding-sibling" => Axis::PrecedingSibling,
            "following-sibling" => Axis::FollowingSibling,
            other => Axis::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Axis::Identity => "self",
            Axis::Child => "child",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::FollowingSibling => "following-sibling",
            Axis::Unknown(name) => name,
        }
    }
}

/// The node test of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.`
    Current,
    /// `..`
    Parent,
    /// `*`
    Wildcard,
    /// The empty segment between two slashes (`//`): recursive descent.
    Descend,
    /// A field name or an array index.
    Name(String),
    /// A step that did not parse. Matches nothing.
    Inert,
}

impl Segment {
    pub fn from_text(text: &str) -> Segment {
        match text {
            "." => Segment::Current,
            ".." => Segment::Parent,
            "*" => Segment::Wildcard,
            "" => Segment::Descend,
            name => Segment::Name(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Segment::Current => ".",
            Segment::Parent => "..",
            Segment::Wildcard => "*",
            Segment::Descend | Segment::Inert => "",
            Segment::Name(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    // Keyword forms: single scalar on each side.
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Symbolic forms: sets of nodes.
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Parses an operator token. Keywords are case-insensitive.
    pub fn from_token(token: &str) -> Option<ComparisonOperator> {
        let op = match token.to_ascii_lowercase().as_str() {
            "eq" => ComparisonOperator::Eq,
            "ne" => ComparisonOperator::Ne,
            "lt" => ComparisonOperator::Lt,
            "le" => ComparisonOperator::Le,
            "gt" => ComparisonOperator::Gt,
            "ge" => ComparisonOperator::Ge,
            "=" => ComparisonOperator::Equals,
            "!=" => ComparisonOperator::NotEquals,
            ">" => ComparisonOperator::GreaterThan,
            "<" => ComparisonOperator::LessThan,
            ">=" => ComparisonOperator::GreaterThanOrEqual,
            "<=" => ComparisonOperator::LessThanOrEqual,
            _ => return None,
        };
        Some(op)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::Eq
                | ComparisonOperator::Ne
                | ComparisonOperator::Lt
                | ComparisonOperator::Le
                | ComparisonOperator::Gt
                | ComparisonOperator::Ge
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "eq",
            ComparisonOperator::Ne => "ne",
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Le => "le",
            ComparisonOperator::Gt => "gt",
            ComparisonOperator::Ge => "ge",
            ComparisonOperator::Equals => "=",
            ComparisonOperator::NotEquals => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
        }
    }
}

/// A bracketed filter such as `[price gt 10]` or `[not(@a = $b)]`. Operands
/// stay as text and are resolved at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub negated: bool,
    pub left: String,
    pub operator: ComparisonOperator,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub segment: Segment,
    pub predicate: Option<Predicate>,
}

impl Step {
    pub(crate) fn inert() -> Step {
        Step {
            axis: Axis::Identity,
            segment: Segment::Inert,
            predicate: None,
        }
    }
}

/// A compiled path: `/a/child::b[c eq 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub is_absolute: bool,
    pub steps: Vec<Step>,
}

impl Path {
    /// The segment text of every step, in order.
    pub fn segments(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.segment.as_str()).collect()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operator.as_str();
        let body = if self.operator.is_keyword() {
            format!("{} {} {}", self.left, op, self.right)
        } else {
            format!("{}{}{}", self.left, op, self.right)
        };
        if self.negated {
            write!(f, "[not({})]", body)
        } else {
            write!(f, "[{}]", body)
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.axis != Axis::Identity {
            write!(f, "{}::", self.axis.name())?;
        }
        f.write_str(self.segment.as_str())?;
        if let Some(predicate) = &self.predicate {
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absolute {
            f.write_str("/")?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
