//! Renders a source document by matching templates and expanding their
//! `$value` specs into a fresh output document.
use crate::config::TransformConfig;
use crate::error::TransformError;
use crate::template::{APPLY_TEMPLATE, ARRAY, COPY_OF, TemplateSet, VALUE_OF, VariableDecl};
use jxt_jpath::{Path, evaluate};
use jxt_tree::{Document, Node, NodeId, NodeType, Scalar};

/// The address used to match templates against `node`: its key path, or the
/// single empty segment for the root (the segments of the path `/`).
pub fn structural_address(node: Node<'_>) -> Vec<String> {
    let path = node.path();
    if path.is_empty() { vec![String::new()] } else { path }
}

fn display_address(address: &[String]) -> String {
    format!("/{}", address.join("/"))
}

pub(crate) struct TemplateExecutor<'t> {
    set: &'t TemplateSet,
    template_doc: &'t Document,
    config: &'t TransformConfig,
    output: Document,
    depth: usize,
}

impl<'t> TemplateExecutor<'t> {
    pub(crate) fn new(set: &'t TemplateSet, template_doc: &'t Document, config: &'t TransformConfig) -> Self {
        TemplateExecutor {
            set,
            template_doc,
            config,
            output: Document::default(),
            depth: 0,
        }
    }

    /// Renders `node` at `address` and returns the finished output document.
    pub(crate) fn run(mut self, address: &[String], node: Node<'_>) -> Result<Option<Document>, TransformError> {
        match self.match_template(address, node)? {
            Some(root) => {
                self.output.set_root(root)?;
                Ok(Some(self.output))
            }
            None => Ok(None),
        }
    }

    /// Renders `source` with the first template whose pattern matches
    /// `address`. No match means no content.
    fn match_template<'n>(&mut self, address: &[String], source: Node<'n>) -> Result<Option<NodeId>, TransformError> {
        let set = self.set;
        let Some(template) = set.templates.iter().find(|t| t.pattern.matches(address)) else {
            log::debug!("No template matches {}", display_address(address));
            if self.config.strict {
                return Err(TransformError::NoMatchingTemplate {
                    address: display_address(address),
                });
            }
            return Ok(None);
        };
        log::debug!("Template '{}' matches {}", template.pattern, display_address(address));

        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(TransformError::RecursionLimit(self.config.max_depth));
        }
        let bound = match &template.variable {
            Some(decl) => Some(self.bind_variable(decl, source)?),
            None => None,
        };
        let vars = bound.as_ref().map(Document::root);
        let value = self.template_doc.node(template.value);
        let result = self.generate(value, source, vars)?;
        self.depth -= 1;
        Ok(result)
    }

    /// Evaluates the declaration from `source` and deep-copies the first node
    /// into a one-member object document.
    fn bind_variable(&self, decl: &VariableDecl, source: Node<'_>) -> Result<Document, TransformError> {
        let selected = evaluate(&decl.select, source, None);
        let mut vars = Document::object();
        let value = match selected.first() {
            Some(node) => vars.import(*node),
            None if self.config.strict => {
                return Err(TransformError::EmptySelection {
                    select: decl.select.to_string(),
                });
            }
            None => vars.create_value(Scalar::Null),
        };
        vars.insert_field(vars.root_id(), decl.name.as_str(), value)?;
        log::trace!("Bound ${} = {}", decl.name, vars.root().to_json());
        Ok(vars)
    }

    fn path_of(&self, directive: Node<'t>) -> Result<&'t Path, TransformError> {
        let set = self.set;
        set.select_path(directive.id()).ok_or_else(|| {
            TransformError::InvalidTemplate(format!("no compiled '$select' for {}", directive.to_json()))
        })
    }

    fn select<'n>(&self, directive: Node<'t>, source: Node<'n>, vars: Option<Node<'n>>) -> Result<Vec<Node<'n>>, TransformError> {
        let path = self.path_of(directive)?;
        let selected = evaluate(path, source, vars);
        log::trace!("'{}' selected {} nodes", path, selected.len());
        Ok(selected)
    }

    /// Expands one content spec. `None` means the spec produced no content and
    /// is left out of its parent.
    fn generate<'n>(&mut self, spec: Node<'t>, source: Node<'n>, vars: Option<Node<'n>>) -> Result<Option<NodeId>, TransformError> {
        match spec.node_type() {
            NodeType::Value => Ok(Some(self.output.import(spec))),
            NodeType::Array => {
                let array = self.output.create_array();
                for element in spec.children() {
                    if let Some(child) = self.generate(element, source, vars)? {
                        self.output.push_element(array, child)?;
                    }
                }
                Ok(Some(array))
            }
            NodeType::Object => {
                if let Some(directive) = spec.child_by_name(APPLY_TEMPLATE) {
                    return self.apply_template(directive, source, vars);
                }
                if let Some(directive) = spec.child_by_name(VALUE_OF) {
                    return self.value_of(directive, source, vars).map(Some);
                }
                if let Some(directive) = spec.child_by_name(COPY_OF) {
                    return self.copy_of(directive, source, vars);
                }
                let object = self.output.create_object();
                for (name, member) in spec.fields() {
                    if let Some(child) = self.generate(member, source, vars)? {
                        self.output.insert_field(object, name, child)?;
                    }
                }
                Ok(Some(object))
            }
        }
    }

    fn apply_template<'n>(&mut self, directive: Node<'t>, source: Node<'n>, vars: Option<Node<'n>>) -> Result<Option<NodeId>, TransformError> {
        let selected = self.select(directive, source, vars)?;
        let as_array = directive
            .child_by_name(ARRAY)
            .and_then(|flag| flag.scalar()?.as_bool())
            .unwrap_or(true);

        if !as_array && selected.len() == 1 {
            let single = selected[0];
            return self.match_template(&structural_address(single), single);
        }
        let array = self.output.create_array();
        for node in selected {
            if let Some(rendered) = self.match_template(&structural_address(node), node)? {
                self.output.push_element(array, rendered)?;
            }
        }
        Ok(Some(array))
    }

    fn value_of<'n>(&mut self, directive: Node<'t>, source: Node<'n>, vars: Option<Node<'n>>) -> Result<NodeId, TransformError> {
        match directive.node_type() {
            NodeType::Object => {
                let selected = self.select(directive, source, vars)?;
                Ok(match selected.first() {
                    Some(node) => self.output.import(*node),
                    None => self.output.create_value(Scalar::Null),
                })
            }
            NodeType::Array => {
                let mut text = String::new();
                for part in directive.children() {
                    match part.node_type() {
                        NodeType::Object => {
                            if let Some(node) = self.select(part, source, vars)?.first() {
                                text.push_str(&node.to_text());
                            }
                        }
                        NodeType::Value => text.push_str(&part.to_text()),
                        NodeType::Array => {}
                    }
                }
                Ok(self.output.create_value(text))
            }
            NodeType::Value => Err(TransformError::InvalidTemplate(format!(
                "'{}' must be an object or an array, found {}",
                VALUE_OF,
                directive.to_json()
            ))),
        }
    }

    fn copy_of<'n>(&mut self, directive: Node<'t>, source: Node<'n>, vars: Option<Node<'n>>) -> Result<Option<NodeId>, TransformError> {
        let selected = self.select(directive, source, vars)?;
        match selected.first() {
            Some(node) => Ok(Some(self.output.import(*node))),
            None if self.config.strict => Err(TransformError::EmptySelection {
                select: self.path_of(directive)?.to_string(),
            }),
            None => Ok(None),
        }
    }
}
