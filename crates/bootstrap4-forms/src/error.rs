//! Error types for forms.

use std::collections::BTreeMap;
use thiserror::Error;

/// Form-specific errors.
///
/// The fluent API in [`crate::FormService`] never surfaces these: it logs
/// and degrades instead. They are returned by the fallible seams
/// (parsing, configuration, route generation).
#[derive(Debug, Error)]
pub enum FormError {
    /// A render kind name that is not one of the known kinds.
    #[error("unknown render kind: {0}")]
    UnknownRenderKind(String),

    /// An HTTP method the form cannot be submitted with.
    #[error("invalid form method: {0}")]
    InvalidMethod(String),

    /// Route name not known to the context.
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// A route placeholder without a matching parameter.
    #[error("missing parameter {param} for route {route}")]
    MissingRouteParameter { route: String, param: String },

    /// JSON (configuration or translations) could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation messages of the previous submission, by field name.
///
/// Filled by the host after validating a submission; the renderer marks
/// fields that have messages as invalid and shows the first message.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    messages: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.messages
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Builder form of [`ValidationErrors::add`].
    #[must_use]
    pub fn with(mut self, field: &str, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a field has at least one message.
    pub fn has(&self, field: &str) -> bool {
        self.first(field).is_some()
    }

    /// The message shown next to a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages
            .get(field)
            .and_then(|m| m.first())
            .map(String::as_str)
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
