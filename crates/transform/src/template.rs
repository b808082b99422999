//! Reading a template document into match patterns and compiled selections.
//!
//! A template document is an array (or an object) of entries shaped like
//!
//! ```json
//! { "$template": {
//!     "$match": "/store/book/*",
//!     "$variable": { "$name": "owner", "$select": "/store/owner" },
//!     "$value": { "title": { "$value-of": { "$select": "title" } } } } }
//! ```
//!
//! Every `$select` found in a `$value` spec is compiled once here and looked up
//! by the id of the directive object that holds it.
use crate::config::TransformConfig;
use crate::error::TransformError;
use jxt_jpath::{Path, compile, compile_strict};
use jxt_tree::{Document, Node, NodeId, NodeType};
use std::collections::HashMap;
use std::fmt;

pub const TEMPLATE: &str = "$template";
pub const MATCH: &str = "$match";
pub const VARIABLE: &str = "$variable";
pub const NAME: &str = "$name";
pub const SELECT: &str = "$select";
pub const VALUE: &str = "$value";
pub const APPLY_TEMPLATE: &str = "$apply-template";
pub const VALUE_OF: &str = "$value-of";
pub const COPY_OF: &str = "$copy-of";
pub const ARRAY: &str = "$array";

/// A `$match` pattern, compared segment by segment against the structural
/// address of the node being rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPattern {
    text: String,
    is_absolute: bool,
    segments: Vec<String>,
}

impl MatchPattern {
    pub fn new(text: &str, strict: bool) -> Result<Self, TransformError> {
        let path = compile_path(text, strict)?;
        Ok(MatchPattern {
            text: text.to_string(),
            is_absolute: path.is_absolute,
            segments: path.segments().into_iter().map(str::to_string).collect(),
        })
    }

    /// Absolute patterns must equal a prefix of the address; relative patterns
    /// must equal its tail. A `*` segment matches any single address segment,
    /// so a field literally named `*` cannot be matched apart from its siblings.
    pub fn matches(&self, address: &[String]) -> bool {
        if self.segments.len() > address.len() {
            return false;
        }
        let segment_matches = |(pattern, actual): (&String, &String)| pattern == "*" || pattern == actual;
        if self.is_absolute {
            self.segments.iter().zip(address).all(segment_matches)
        } else {
            self.segments.iter().rev().zip(address.iter().rev()).all(segment_matches)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A `$variable` declaration: its first selected node is bound as `$name`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub select: Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub pattern: MatchPattern,
    pub variable: Option<VariableDecl>,
    /// The `$value` spec inside the template document.
    pub value: NodeId,
}

/// All templates of one template document, in document order.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub(crate) templates: Vec<Template>,
    pub(crate) selects: HashMap<NodeId, Path>,
}

pub(crate) fn compile_path(text: &str, strict: bool) -> Result<Path, TransformError> {
    if strict {
        Ok(compile_strict(text)?)
    } else {
        Ok(compile(text))
    }
}

fn string_field<'a>(node: Node<'a>, name: &str) -> Option<&'a str> {
    node.child_by_name(name)?.scalar()?.as_str()
}

fn describe(node: Node<'_>) -> String {
    match node.key() {
        Some(key) => format!("'{}'", key),
        None => "the root".to_string(),
    }
}

impl TemplateSet {
    pub fn read(doc: &Document, config: &TransformConfig) -> Result<Self, TransformError> {
        let root = doc.root();
        if root.node_type() == NodeType::Value {
            return Err(TransformError::InvalidTemplate(
                "the template document must be an array or an object of templates".to_string(),
            ));
        }
        let mut set = TemplateSet {
            templates: Vec::with_capacity(root.child_count()),
            selects: HashMap::new(),
        };
        for entry in root.children() {
            let template = set.read_template(entry, config.strict)?;
            set.templates.push(template);
        }
        log::debug!("Read {} templates", set.templates.len());
        Ok(set)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub(crate) fn select_path(&self, directive: NodeId) -> Option<&Path> {
        self.selects.get(&directive)
    }

    fn read_template(&mut self, entry: Node<'_>, strict: bool) -> Result<Template, TransformError> {
        let invalid = |message: &str| TransformError::InvalidTemplate(format!("entry {}: {}", describe(entry), message));

        let body = entry
            .child_by_name(TEMPLATE)
            .filter(|body| body.is_object())
            .ok_or_else(|| invalid("missing '$template' object"))?;
        let pattern = string_field(body, MATCH).ok_or_else(|| invalid("'$match' must be a string"))?;
        let pattern = MatchPattern::new(pattern, strict)?;

        let variable = match body.child_by_name(VARIABLE) {
            None => None,
            Some(decl) => {
                let name = string_field(decl, NAME).ok_or_else(|| invalid("'$variable' needs a string '$name'"))?;
                let select = string_field(decl, SELECT).ok_or_else(|| invalid("'$variable' needs a string '$select'"))?;
                Some(VariableDecl {
                    name: name.to_string(),
                    select: compile_path(select, strict)?,
                })
            }
        };

        let value = body.child_by_name(VALUE).ok_or_else(|| invalid("missing '$value'"))?;
        self.collect_selects(value, strict)?;

        Ok(Template {
            pattern,
            variable,
            value: value.id(),
        })
    }

    /// Compiles every `$select` reachable from a content spec, checking the
    /// shape of each directive on the way.
    fn collect_selects(&mut self, spec: Node<'_>, strict: bool) -> Result<(), TransformError> {
        match spec.node_type() {
            NodeType::Value => Ok(()),
            NodeType::Array => spec.children().try_for_each(|child| self.collect_selects(child, strict)),
            NodeType::Object => {
                if let Some(directive) = spec.child_by_name(APPLY_TEMPLATE) {
                    let flag = directive.child_by_name(ARRAY);
                    if flag.is_some_and(|f| f.scalar().and_then(|s| s.as_bool()).is_none()) {
                        return Err(TransformError::InvalidTemplate(format!(
                            "'{}' must be a boolean in {}",
                            ARRAY,
                            directive.to_json()
                        )));
                    }
                    self.register_select(APPLY_TEMPLATE, directive, strict)
                } else if let Some(directive) = spec.child_by_name(VALUE_OF) {
                    match directive.node_type() {
                        NodeType::Object => self.register_select(VALUE_OF, directive, strict),
                        NodeType::Array => directive
                            .children()
                            .filter(|part| part.is_object())
                            .try_for_each(|part| self.register_select(VALUE_OF, part, strict)),
                        NodeType::Value => Err(TransformError::InvalidTemplate(format!(
                            "'{}' must be an object or an array, found {}",
                            VALUE_OF,
                            directive.to_json()
                        ))),
                    }
                } else if let Some(directive) = spec.child_by_name(COPY_OF) {
                    self.register_select(COPY_OF, directive, strict)
                } else {
                    spec.children().try_for_each(|child| self.collect_selects(child, strict))
                }
            }
        }
    }

    fn register_select(&mut self, directive_name: &str, directive: Node<'_>, strict: bool) -> Result<(), TransformError> {
        let text = string_field(directive, SELECT).ok_or_else(|| {
            TransformError::InvalidTemplate(format!(
                "'{}' needs a string '{}', found {}",
                directive_name,
                SELECT,
                directive.to_json()
            ))
        })?;
        self.selects.insert(directive.id(), compile_path(text, strict)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jxt_tree::parse_str;

    fn address(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    fn pattern(text: &str) -> MatchPattern {
        MatchPattern::new(text, false).unwrap()
    }

    #[test]
    fn test_root_pattern() {
        assert!(pattern("/").matches(&address(&[""])));
        assert!(!pattern("/").matches(&address(&["items", "0"])));
    }

    #[test]
    fn test_absolute_patterns_match_prefix() {
        assert!(pattern("/items").matches(&address(&["items"])));
        assert!(pattern("/items").matches(&address(&["items", "0"])));
        assert!(!pattern("/items/0").matches(&address(&["items"])));
        assert!(!pattern("/other").matches(&address(&["items", "0"])));
    }

    #[test]
    fn test_relative_patterns_match_tail() {
        assert!(pattern("book").matches(&address(&["store", "book"])));
        assert!(pattern("store/book").matches(&address(&["store", "book"])));
        assert!(!pattern("book").matches(&address(&["store", "book", "0"])));
    }

    #[test]
    fn test_wildcard_segment() {
        assert!(pattern("/items/*").matches(&address(&["items", "0"])));
        assert!(pattern("/items/*").matches(&address(&["items", "12"])));
        assert!(pattern("*/title").matches(&address(&["store", "book", "0", "title"])));
        assert!(!pattern("/items/*").matches(&address(&[""])));
        assert!(pattern("/a/*").matches(&address(&["a", "*"])));
        assert!(pattern("/a/*").matches(&address(&["a", "x"])));
    }

    #[test]
    fn test_read_templates_in_document_order() {
        let doc = parse_str(
            r#"{
                "root": {"$template": {"$match": "/", "$value": {"$apply-template": {"$select": "/items/*"}}}},
                "item": {"$template": {"$match": "/items/*", "$value": {"$copy-of": {"$select": "."}}}}
            }"#,
        )
        .unwrap();
        let set = TemplateSet::read(&doc, &TransformConfig::default()).unwrap();
        let patterns: Vec<_> = set.templates().iter().map(|t| t.pattern.text()).collect();
        assert_eq!(patterns, vec!["/", "/items/*"]);
        assert_eq!(set.selects.len(), 2);
    }

    #[test]
    fn test_variable_declaration() {
        let doc = parse_str(
            r#"[{"$template": {"$match": "/", "$variable": {"$name": "v", "$select": "/a"}, "$value": 1}}]"#,
        )
        .unwrap();
        let set = TemplateSet::read(&doc, &TransformConfig::default()).unwrap();
        let decl = set.templates()[0].variable.as_ref().unwrap();
        assert_eq!(decl.name, "v");
        assert_eq!(decl.select.to_string(), "/a");
    }

    #[test]
    fn test_shape_errors() {
        let config = TransformConfig::default();
        let cases = [
            r#"[{"$match": "/"}]"#,
            r#"[{"$template": {"$match": 3, "$value": 1}}]"#,
            r#"[{"$template": {"$match": "/"}}]"#,
            r#"[{"$template": {"$match": "/", "$variable": {"$name": "v"}, "$value": 1}}]"#,
            r#"[{"$template": {"$match": "/", "$value": {"$copy-of": {}}}}]"#,
            r#"[{"$template": {"$match": "/", "$value": {"$value-of": "x"}}}]"#,
            r#"[{"$template": {"$match": "/", "$value": {"$apply-template": {"$select": ".", "$array": "no"}}}}]"#,
            r#""not templates""#,
        ];
        for case in cases {
            let doc = parse_str(case).unwrap();
            assert!(
                matches!(TemplateSet::read(&doc, &config), Err(TransformError::InvalidTemplate(_))),
                "expected an invalid template for {}",
                case
            );
        }
    }

    #[test]
    fn test_strict_mode_rejects_malformed_paths() {
        let doc = parse_str(r#"[{"$template": {"$match": "/", "$value": {"$copy-of": {"$select": "/a:b"}}}}]"#).unwrap();
        assert!(TemplateSet::read(&doc, &TransformConfig::default()).is_ok());
        let strict = TransformConfig {
            strict: true,
            ..TransformConfig::default()
        };
        assert!(matches!(
            TemplateSet::read(&doc, &strict),
            Err(TransformError::JPath(_))
        ));
    }
}
