//! Service-wide defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::Method;

/// Defaults applied when a chain does not set a value itself.
///
/// ```
/// use bootstrap4_forms::FormConfig;
///
/// let config = FormConfig::from_json(r#"{"id_prefix": "inp-", "button_color": "dark"}"#).unwrap();
/// assert_eq!(config.id_prefix, "inp-");
/// assert_eq!(config.csrf_field, "_token");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Prefix prepended to generated ids.
    pub id_prefix: String,
    /// Method used when a form does not set one.
    pub method: Method,
    /// Button color used when a button does not set one.
    pub button_color: String,
    /// Translation key prefix used when a form does not set one.
    pub locale: Option<String>,
    /// `rows` attribute of textareas.
    pub textarea_rows: Option<usize>,
    /// Name of the hidden CSRF field.
    pub csrf_field: String,
    /// Name of the hidden field carrying a spoofed method.
    pub method_field: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            id_prefix: String::new(),
            method: Method::Post,
            button_color: "primary".to_string(),
            locale: None,
            textarea_rows: None,
            csrf_field: "_token".to_string(),
            method_field: "_method".to_string(),
        }
    }
}

impl FormConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the id prefix.
    #[must_use]
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Sets the default method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the default button color.
    #[must_use]
    pub fn button_color(mut self, color: impl Into<String>) -> Self {
        self.button_color = color.into();
        self
    }

    /// Sets the default translation prefix.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the textarea rows.
    #[must_use]
    pub fn textarea_rows(mut self, rows: usize) -> Self {
        self.textarea_rows = Some(rows);
        self
    }
}
