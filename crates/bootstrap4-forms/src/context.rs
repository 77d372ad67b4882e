//! Collaborators supplied by the host application.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::{FormError, Result, ValidationErrors};
use crate::render::html_escape;

// A placeholder with the slash in front of it, so a dropped optional
// parameter takes its segment along.
static ROUTE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(/?)\{(\w+)(\?)?\}").expect("Invalid route parameter regex")
});

/// What the renderer needs from the surrounding web framework.
///
/// Every method has a default so a host implements only what it has.
pub trait FormContext {
    /// Turns a path into a full URL.
    fn url(&self, path: &str) -> String {
        path.to_string()
    }

    /// Generates the URL of a named route.
    fn route(&self, name: &str, _params: &[(&str, &str)]) -> Result<String> {
        Err(FormError::UnknownRoute(name.to_string()))
    }

    /// Looks up a translation, falling back to the key itself.
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }

    /// Escapes text for HTML content and attribute values.
    fn escape(&self, text: &str) -> String {
        html_escape(text)
    }

    /// Token emitted in non-GET forms.
    fn csrf_token(&self) -> Option<&str> {
        None
    }

    /// Whether the previous request submitted input.
    fn has_old_input(&self) -> bool {
        false
    }

    /// A value of the previous submission.
    fn old_input(&self, _name: &str) -> Option<&str> {
        None
    }

    /// Validation errors of the previous submission.
    fn errors(&self) -> Option<&ValidationErrors> {
        None
    }
}

/// An in-memory [`FormContext`].
///
/// Routes are patterns such as `/users/{id}/posts/{post?}`; parameters not
/// used by the pattern are appended as a query string. Translations are a
/// flat map of dotted keys.
///
/// # Example
///
/// ```
/// use bootstrap4_forms::{FormContext, StaticContext};
///
/// let ctx = StaticContext::new()
///     .with_base_url("https://example.com")
///     .with_route("users.show", "/users/{id}");
///
/// assert_eq!(
///     ctx.route("users.show", &[("id", "7"), ("tab", "posts")]).unwrap(),
///     "https://example.com/users/7?tab=posts"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    base_url: String,
    routes: HashMap<String, String>,
    translations: HashMap<String, String>,
    csrf_token: Option<String>,
    old_input: HashMap<String, String>,
    errors: ValidationErrors,
}

impl StaticContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL relative paths are joined to.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Registers a named route pattern.
    #[must_use]
    pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.routes.insert(name.into(), pattern.into());
        self
    }

    /// Adds a translation.
    #[must_use]
    pub fn with_translation(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(key.into(), text.into());
        self
    }

    /// Adds translations from a JSON document.
    ///
    /// Nested objects are flattened into dotted keys, so
    /// `{"forms": {"name": "Nome"}}` defines `forms.name`.
    pub fn with_translations_json(mut self, json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        flatten_into(&mut self.translations, "", &document);
        Ok(self)
    }

    /// Sets the CSRF token.
    #[must_use]
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Records a value of the previous submission.
    #[must_use]
    pub fn with_old_input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.old_input.insert(name.into(), value.into());
        self
    }

    /// Sets the validation errors of the previous submission.
    #[must_use]
    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = errors;
        self
    }

    fn absolute(&self, path: &str) -> String {
        if self.base_url.is_empty()
            || path.starts_with("http://")
            || path.starts_with("https://")
            || path.starts_with("//")
        {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl FormContext for StaticContext {
    fn url(&self, path: &str) -> String {
        self.absolute(path)
    }

    fn route(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| FormError::UnknownRoute(name.to_string()))?;

        let mut missing = None;
        let mut used = Vec::new();
        let path = ROUTE_PARAM.replace_all(pattern, |caps: &Captures<'_>| {
            let param = &caps[2];
            match params.iter().find(|(k, _)| *k == param) {
                Some((key, value)) => {
                    used.push(*key);
                    format!("{}{value}", &caps[1])
                }
                None => {
                    if caps.get(3).is_none() && missing.is_none() {
                        missing = Some(param.to_string());
                    }
                    String::new()
                }
            }
        });

        if let Some(param) = missing {
            return Err(FormError::MissingRouteParameter {
                route: name.to_string(),
                param,
            });
        }

        let mut path = if path.is_empty() {
            "/".to_string()
        } else {
            path.into_owned()
        };

        let query: Vec<String> = params
            .iter()
            .filter(|(k, _)| !used.contains(k))
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        if !query.is_empty() {
            path = format!("{path}?{}", query.join("&"));
        }

        Ok(self.absolute(&path))
    }

    fn translate(&self, key: &str) -> String {
        self.translations
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    fn has_old_input(&self) -> bool {
        !self.old_input.is_empty()
    }

    fn old_input(&self, name: &str) -> Option<&str> {
        self.old_input.get(name).map(String::as_str)
    }

    fn errors(&self) -> Option<&ValidationErrors> {
        if self.errors.is_empty() {
            None
        } else {
            Some(&self.errors)
        }
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(out, &key, child);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
