use crate::config::TransformConfig;
use crate::error::TransformError;
use crate::executor::{TemplateExecutor, structural_address};
use crate::template::{Template, TemplateSet};
use jxt_tree::{Document, Node, parse_file, parse_str};
use std::path::{Path, PathBuf};

/// A compiled template document, ready to render any number of sources.
#[derive(Debug, Clone)]
pub struct Transformer {
    template_doc: Document,
    set: TemplateSet,
    config: TransformConfig,
}

impl Transformer {
    pub fn new(templates: Document) -> Result<Self, TransformError> {
        Self::with_config(templates, TransformConfig::default())
    }

    pub fn with_config(templates: Document, config: TransformConfig) -> Result<Self, TransformError> {
        let set = TemplateSet::read(&templates, &config)?;
        Ok(Transformer {
            template_doc: templates,
            set,
            config,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, TransformError> {
        Self::new(parse_str(text)?)
    }

    pub fn builder() -> TransformerBuilder {
        TransformerBuilder::default()
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn templates(&self) -> &[Template] {
        self.set.templates()
    }

    /// Renders `source` starting from its root. `Ok(None)` when no template
    /// matches the root address.
    pub fn render(&self, source: &Document) -> Result<Option<Document>, TransformError> {
        self.render_node(source.root())
    }

    /// Renders `node` as if it were reached by `$apply-template`: the first
    /// template matching its structural address produces the output.
    pub fn render_node(&self, node: Node<'_>) -> Result<Option<Document>, TransformError> {
        let address = structural_address(node);
        TemplateExecutor::new(&self.set, &self.template_doc, &self.config).run(&address, node)
    }

    pub fn process_str(&self, source: &str) -> Result<Option<Document>, TransformError> {
        self.render(&parse_str(source)?)
    }

    pub fn process_file(&self, source: impl AsRef<Path>) -> Result<Option<Document>, TransformError> {
        self.render(&parse_file(source)?)
    }
}

#[derive(Debug, Clone)]
enum TemplateSource {
    Document(Document),
    Text(String),
    File(PathBuf),
}

/// Assembles a [`Transformer`] from a template source and options.
#[derive(Debug, Clone, Default)]
pub struct TransformerBuilder {
    source: Option<TemplateSource>,
    config: TransformConfig,
}

impl TransformerBuilder {
    pub fn template(mut self, templates: Document) -> Self {
        self.source = Some(TemplateSource::Document(templates));
        self
    }

    pub fn template_str(mut self, text: impl Into<String>) -> Self {
        self.source = Some(TemplateSource::Text(text.into()));
        self
    }

    pub fn template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(TemplateSource::File(path.into()));
        self
    }

    pub fn config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn build(self) -> Result<Transformer, TransformError> {
        let templates = match self.source {
            Some(TemplateSource::Document(doc)) => doc,
            Some(TemplateSource::Text(text)) => parse_str(&text)?,
            Some(TemplateSource::File(path)) => parse_file(path)?,
            None => {
                return Err(TransformError::InvalidTemplate(
                    "no template document was provided".to_string(),
                ));
            }
        };
        Transformer::with_config(templates, self.config)
    }
}
