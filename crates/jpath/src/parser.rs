//! Compiles path text into a [`Path`].
//!
//! Splitting into steps uses `nom`; each step is then checked against a single
//! regular grammar. Compilation is lenient: a step that does not fit the
//! grammar compiles to an inert step that selects nothing.
use crate::ast::{Axis, ComparisonOperator, Path, Predicate, Segment, Step};
use crate::error::JPathError;
use nom::{
    IResult, Parser,
    bytes::complete::take_while,
    character::complete::char,
    combinator::{opt, recognize},
    sequence::preceded,
};
use regex::Regex;
use std::sync::LazyLock;

/// `axis::segment[not(left op right)]`, every part optional except that a
/// predicate needs both operands and an operator.
static STEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([^\[\]:]*)::)?([^\[\]:]*)?(\[((not)\()?([^!=<>()]+)(=|!=|>|<|>=|<=| eq | ne | lt | le | gt | ge )([^!=<>()]+)(\))?\])?$",
    )
    .expect("BUG: invalid STEP_RE regex literal")
});

const AXIS: usize = 2;
const SEGMENT: usize = 3;
const PREDICATE: usize = 4;
const FUNCTION: usize = 6;
const LEFT_OPERAND: usize = 7;
const OPERATOR: usize = 8;
const RIGHT_OPERAND: usize = 9;
const CLOSE_FUNCTION: usize = 10;

/// Compiles `text`. Never fails: malformed steps become inert.
pub fn compile(text: &str) -> Path {
    let steps = split_steps(text)
        .into_iter()
        .map(|step| parse_step(step).into_step())
        .collect();
    let path = Path {
        is_absolute: text.starts_with('/'),
        steps,
    };
    log::trace!("Compiled '{}' into {:?}", text, path.steps);
    path
}

/// Compiles `text`, reporting the first step that does not fit the grammar.
pub fn compile_strict(text: &str) -> Result<Path, JPathError> {
    let mut steps = Vec::new();
    for step in split_steps(text) {
        match parse_step(step) {
            ParsedStep::WellFormed(parsed) => steps.push(parsed),
            ParsedStep::Recovered(_) => {
                return Err(JPathError::MalformedStep {
                    path: text.to_string(),
                    step: step.to_string(),
                });
            }
        }
    }
    Ok(Path {
        is_absolute: text.starts_with('/'),
        steps,
    })
}

// --- Splitting ---

/// One step: an optional leading `/`, then text up to the next bracket or
/// slash, then an optional bracketed predicate. Only the part after the slash
/// is returned.
fn step_text(input: &str) -> IResult<&str, &str> {
    preceded(
        opt(char('/')),
        recognize((
            take_while(|c: char| c != '[' && c != ']' && c != '/'),
            opt((char('['), take_while(|c: char| c != ']'), char(']'))),
        )),
    )
    .parse(input)
}

/// Repeatedly scans for [`step_text`]. A scan that consumes nothing yields an
/// empty step and skips one character; the final scan at the end of input is
/// always empty and is dropped.
pub(crate) fn split_steps(text: &str) -> Vec<&str> {
    let mut steps = Vec::new();
    let mut rest = text;
    while let Ok((after, step)) = step_text(rest) {
        if after.len() < rest.len() {
            steps.push(step);
            rest = after;
            continue;
        }
        match rest.chars().next() {
            Some(skipped) => {
                steps.push("");
                rest = &rest[skipped.len_utf8()..];
            }
            None => break,
        }
    }
    steps
}

// --- Steps ---

enum ParsedStep {
    WellFormed(Step),
    /// The step did not fit the grammar; carries what lenient compilation uses.
    Recovered(Step),
}

impl ParsedStep {
    fn into_step(self) -> Step {
        match self {
            ParsedStep::WellFormed(step) | ParsedStep::Recovered(step) => step,
        }
    }
}

fn parse_step(text: &str) -> ParsedStep {
    let Some(caps) = STEP_RE.captures(text) else {
        log::debug!("Step '{}' does not match the step grammar", text);
        return ParsedStep::Recovered(Step::inert());
    };
    let group = |i: usize| caps.get(i).map(|m| m.as_str().trim());

    let axis = Axis::from_name(group(AXIS).unwrap_or(""));
    let segment = Segment::from_text(group(SEGMENT).unwrap_or(""));
    let step = |predicate| Step {
        axis: axis.clone(),
        segment: segment.clone(),
        predicate,
    };

    if group(PREDICATE).is_none() {
        return ParsedStep::WellFormed(step(None));
    }
    let negated = group(FUNCTION).is_some();
    if negated && group(CLOSE_FUNCTION).is_none() {
        log::debug!("Unclosed 'not(' in step '{}', predicate ignored", text);
        return ParsedStep::Recovered(step(None));
    }
    let (Some(left), Some(operator), Some(right)) = (
        group(LEFT_OPERAND),
        group(OPERATOR).and_then(ComparisonOperator::from_token),
        group(RIGHT_OPERAND),
    ) else {
        return ParsedStep::Recovered(Step::inert());
    };
    ParsedStep::WellFormed(step(Some(Predicate {
        negated,
        left: left.to_string(),
        operator,
        right: right.to_string(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_steps() {
        assert_eq!(split_steps("/"), vec![""]);
        assert_eq!(split_steps("//y"), vec!["", "y"]);
        assert_eq!(split_steps("a//b"), vec!["a", "", "b"]);
        assert_eq!(split_steps("/a/b"), vec!["a", "b"]);
        assert_eq!(split_steps(""), Vec::<&str>::new());
        assert_eq!(split_steps("/items/*[price gt 10]"), vec!["items", "*[price gt 10]"]);
    }

    #[test]
    fn test_predicate_keeps_slashes() {
        assert_eq!(
            split_steps("/store/book[author = /store/owner]/title"),
            vec!["store", "book[author = /store/owner]", "title"]
        );
    }

    #[test]
    fn test_split_steps_skips_stray_bracket() {
        assert_eq!(split_steps("a]b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_compile_absolute_and_relative() {
        let path = compile("/a/b");
        assert!(path.is_absolute);
        assert_eq!(path.segments(), vec!["a", "b"]);
        let path = compile("a/..");
        assert!(!path.is_absolute);
        assert_eq!(path.steps[1].segment, Segment::Parent);
    }

    #[test]
    fn test_compile_axes() {
        let path = compile("descendant-or-self::name/following-sibling::*/self::.");
        assert_eq!(path.steps[0].axis, Axis::DescendantOrSelf);
        assert_eq!(path.steps[0].segment, Segment::Name("name".to_string()));
        assert_eq!(path.steps[1].axis, Axis::FollowingSibling);
        assert_eq!(path.steps[1].segment, Segment::Wildcard);
        assert_eq!(path.steps[2].axis, Axis::Identity);
        assert_eq!(path.steps[2].segment, Segment::Current);
        assert_eq!(compile("sideways::a").steps[0].axis, Axis::Unknown("sideways".to_string()));
    }

    #[test]
    fn test_compile_predicates() {
        let path = compile("*[price gt 10]");
        let predicate = path.steps[0].predicate.as_ref().unwrap();
        assert!(!predicate.negated);
        assert_eq!(predicate.left, "price");
        assert_eq!(predicate.operator, ComparisonOperator::Gt);
        assert_eq!(predicate.right, "10");

        let path = compile(r#"book[not(category = "fiction")]"#);
        let predicate = path.steps[0].predicate.as_ref().unwrap();
        assert!(predicate.negated);
        assert_eq!(predicate.operator, ComparisonOperator::Equals);
        assert_eq!(predicate.right, r#""fiction""#);

        let path = compile("a[b>=1]");
        assert_eq!(
            path.steps[0].predicate.as_ref().unwrap().operator,
            ComparisonOperator::GreaterThanOrEqual
        );
    }

    #[test]
    fn test_lenient_compilation() {
        let path = compile("a:b/c");
        assert_eq!(path.steps[0].segment, Segment::Inert);
        assert_eq!(path.steps[0].segment.as_str(), "");
        assert_eq!(path.steps[1].segment, Segment::Name("c".to_string()));

        let path = compile("a[not(b eq 1]");
        assert_eq!(path.steps[0].segment, Segment::Name("a".to_string()));
        assert!(path.steps[0].predicate.is_none());

        // Keyword operators need their surrounding spaces.
        assert_eq!(compile("a[bgtc]").steps[0].segment, Segment::Inert);
    }

    #[test]
    fn test_compile_strict_reports_step() {
        assert!(compile_strict("/a/b[c eq 1]").is_ok());
        assert_eq!(
            compile_strict("/a/b:c/d"),
            Err(JPathError::MalformedStep {
                path: "/a/b:c/d".to_string(),
                step: "b:c".to_string()
            })
        );
        assert!(compile_strict("a[not(b = 1]").is_err());
    }

    #[test]
    fn test_display_round_trips_text() {
        for text in ["/a/b", "//y", "/", "child::*[price gt 10]", "a[not(b=1)]"] {
            assert_eq!(compile(text).to_string(), text);
        }
    }
}
