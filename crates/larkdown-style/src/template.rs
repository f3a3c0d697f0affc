//! Template registry.
//!
//! A [`Template`] is a named [`StyleModel`] preset with display metadata, a CSS
//! class used to scope the rendered container, and an optional post-render
//! transform. The built-in registry is initialized once and never mutated.

use std::sync::LazyLock;

use serde::Serialize;

use crate::builtin;
use crate::model::StyleModel;

/// Output of a post-render transform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformOutput {
    /// Replacement HTML.
    Html(String),
    /// Structured result exposing an `html` or `content` field.
    Structured {
        html: Option<String>,
        content: Option<String>,
    },
}

impl TransformOutput {
    /// The replacement HTML, preferring `html` over `content`.
    ///
    /// Returns `None` for a structured result with neither field.
    #[must_use]
    pub fn into_html(self) -> Option<String> {
        match self {
            Self::Html(html) => Some(html),
            Self::Structured { html, content } => html.or(content),
        }
    }
}

/// Failure reported by a transform hook.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(pub String);

/// Post-render HTML transform.
pub type TransformFn = fn(&str) -> Result<TransformOutput, TransformError>;

/// A named style preset.
#[derive(Clone, Debug)]
pub struct Template {
    id: String,
    name: String,
    description: String,
    class_name: String,
    theme_variable: String,
    styles: StyleModel,
    transform: Option<TransformFn>,
}

impl Template {
    /// Create a template with the given id, display name and styles.
    ///
    /// The class name defaults to `{id}-template` and the theme variable to
    /// `theme-color`.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, styles: StyleModel) -> Self {
        let id = id.into();
        Self {
            class_name: format!("{id}-template"),
            id,
            name: name.into(),
            description: String::new(),
            theme_variable: "theme-color".to_owned(),
            styles,
            transform: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the CSS custom property (without `--`) the styles use for the theme color.
    #[must_use]
    pub fn theme_variable(mut self, name: impl Into<String>) -> Self {
        self.theme_variable = name.into();
        self
    }

    #[must_use]
    pub fn transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class_name
    }

    pub fn theme_var(&self) -> &str {
        &self.theme_variable
    }

    pub fn styles(&self) -> &StyleModel {
        &self.styles
    }

    pub fn transform_fn(&self) -> Option<TransformFn> {
        self.transform
    }

    /// Summary for selection lists.
    pub fn info(&self) -> CatalogEntry<'_> {
        CatalogEntry {
            id: &self.id,
            name: &self.name,
            description: &self.description,
        }
    }
}

/// `{id, name, description}` tuple exposed to selection UIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
}

/// Error building a template registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("template registry must contain at least one template")]
    Empty,
    #[error("duplicate template id: {0}")]
    DuplicateId(String),
}

/// Ordered, non-empty set of templates.
#[derive(Debug)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

static BUILTIN: LazyLock<TemplateRegistry> = LazyLock::new(|| TemplateRegistry {
    templates: vec![builtin::default_template(), builtin::wechat_template()],
});

impl TemplateRegistry {
    /// Build a registry. The first template is the fallback for unknown ids.
    pub fn new(templates: Vec<Template>) -> Result<Self, RegistryError> {
        if templates.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (i, template) in templates.iter().enumerate() {
            if templates[..i].iter().any(|t| t.id == template.id) {
                return Err(RegistryError::DuplicateId(template.id.clone()));
            }
        }
        Ok(Self { templates })
    }

    /// The process-wide registry of built-in templates (`default`, `wechat`).
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Find a template by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Find a template by id, falling back to the first registered template.
    #[must_use]
    pub fn get(&self, id: &str) -> &Template {
        self.find(id).unwrap_or(&self.templates[0])
    }

    /// The fallback template.
    #[must_use]
    pub fn first(&self) -> &Template {
        &self.templates[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Catalog entries in registration order.
    pub fn catalog(&self) -> Vec<CatalogEntry<'_>> {
        self.templates.iter().map(Template::info).collect()
    }
}
