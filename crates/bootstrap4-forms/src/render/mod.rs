//! Rendering of form fragments.

mod bootstrap;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::FormConfig;
use crate::context::FormContext;
use crate::error::FormError;
use crate::state::{FieldState, FieldValue};

/// The fragment template selected for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderKind {
    Open,
    Close,
    FieldsetOpen,
    FieldsetClose,
    File,
    Text,
    Password,
    Email,
    Number,
    Hidden,
    Select,
    Checkbox,
    Radio,
    Textarea,
    Button,
    Submit,
    Reset,
    Anchor,
}

impl RenderKind {
    /// Every render kind, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Open,
        Self::Close,
        Self::FieldsetOpen,
        Self::FieldsetClose,
        Self::File,
        Self::Text,
        Self::Password,
        Self::Email,
        Self::Number,
        Self::Hidden,
        Self::Select,
        Self::Checkbox,
        Self::Radio,
        Self::Textarea,
        Self::Button,
        Self::Submit,
        Self::Reset,
        Self::Anchor,
    ];

    /// The kind's name as used by `render_as` and `input_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::FieldsetOpen => "fieldsetOpen",
            Self::FieldsetClose => "fieldsetClose",
            Self::File => "file",
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
            Self::Number => "number",
            Self::Hidden => "hidden",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Textarea => "textarea",
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Anchor => "anchor",
        }
    }

    /// Checkbox or radio.
    pub fn is_check(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

impl fmt::Display for RenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FormError::UnknownRenderKind(s.to_string()))
    }
}

/// A rendered piece of HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fragment(String);

impl Fragment {
    /// Wraps already rendered markup.
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// An empty fragment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Fragment> for String {
    fn from(fragment: Fragment) -> Self {
        fragment.0
    }
}

/// Ordered HTML attributes of a single tag.
#[derive(Debug, Clone, Default)]
pub struct HtmlAttrs {
    attrs: Vec<(String, String)>,
}

impl HtmlAttrs {
    /// Creates new empty attributes.
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    /// Sets an attribute, replacing an earlier value of the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Sets an attribute when a value is present.
    pub fn set_opt(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Sets a boolean attribute (`disabled="disabled"`) when `on`.
    pub fn flag(&mut self, key: &str, on: bool) {
        if on {
            self.set(key, key);
        }
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Merges user supplied attributes.
    ///
    /// Classes are appended; for any other key the existing value wins.
    pub fn merge<'a>(&mut self, extra: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (key, value) in extra {
            if key == "class" {
                let class = match self.get("class") {
                    Some(current) if !current.is_empty() => format!("{current} {value}"),
                    _ => value.clone(),
                };
                self.set("class", class);
            } else if self.get(key).is_none() {
                self.set(key.clone(), value.clone());
            }
        }
    }

    /// Renders attributes as an HTML attribute string with a leading space.
    pub fn to_html(&self, escape: impl Fn(&str) -> String) -> String {
        self.attrs
            .iter()
            .map(|(k, v)| format!(r#" {k}="{}""#, escape(v)))
            .collect()
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders fragments from a [`FieldState`].
///
/// Rendering reads only the state, the configuration and the context; it
/// has no side effects.
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    config: FormConfig,
}

impl FormBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: FormConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Renders `kind` from the accumulated state.
    pub fn render(&self, kind: RenderKind, state: &FieldState, ctx: &dyn FormContext) -> String {
        match kind {
            RenderKind::Open => self.form_open(state, ctx),
            RenderKind::Close => "</form>".to_string(),
            RenderKind::FieldsetOpen => self.fieldset_open(state, ctx),
            RenderKind::FieldsetClose => "</fieldset>".to_string(),
            RenderKind::File
            | RenderKind::Text
            | RenderKind::Password
            | RenderKind::Email
            | RenderKind::Number
            | RenderKind::Hidden => self.input(kind, state, ctx),
            RenderKind::Select => self.select(state, ctx),
            RenderKind::Checkbox | RenderKind::Radio => self.check(kind, state, ctx),
            RenderKind::Textarea => self.textarea(state, ctx),
            RenderKind::Button | RenderKind::Submit | RenderKind::Reset => {
                self.button(kind, state, ctx)
            }
            RenderKind::Anchor => self.anchor(state, ctx),
        }
    }

    /// Translates a text key under the form's locale.
    ///
    /// A key missing from the locale falls back to its plain translation.
    fn translate(&self, state: &FieldState, ctx: &dyn FormContext, key: &str) -> String {
        let locale = state
            .form
            .locale
            .as_deref()
            .or(self.config.locale.as_deref());
        if let Some(locale) = locale {
            let prefixed = format!("{locale}.{key}");
            let text = ctx.translate(&prefixed);
            if text != prefixed {
                return text;
            }
        }
        ctx.translate(key)
    }

    /// Translated and escaped text content.
    fn text(&self, state: &FieldState, ctx: &dyn FormContext, key: &str) -> String {
        ctx.escape(&self.translate(state, ctx, key))
    }

    /// Explicit id, else the prefixed name; radios append their value.
    fn field_id(&self, kind: RenderKind, state: &FieldState) -> Option<String> {
        if let Some(id) = &state.id {
            return Some(id.clone());
        }
        let name = state.name.as_deref()?;
        let prefix = state
            .form
            .id_prefix
            .as_deref()
            .unwrap_or(&self.config.id_prefix);
        let mut id = format!("{prefix}{}", name.trim_end_matches("[]"));
        if kind == RenderKind::Radio {
            if let Some(value) = &state.meta.value {
                id.push('-');
                id.push_str(value);
            }
        }
        Some(id)
    }

    /// Previously submitted input, then fill data, then the explicit value.
    fn resolved_value(&self, state: &FieldState, ctx: &dyn FormContext) -> Option<FieldValue> {
        if let Some(name) = state.name.as_deref() {
            let key = name.trim_end_matches("[]");
            if ctx.has_old_input() {
                // An unchecked box is absent from the submission.
                let old = ctx.old_input(key).map(FieldValue::from);
                if old.is_some() || state.is_check() {
                    return old;
                }
            }
            if let Some(filled) = state.form.data.get(key).and_then(FieldValue::from_json) {
                return Some(filled);
            }
        }
        state.value.clone()
    }

    /// Whether a checkbox or radio is checked.
    fn is_checked(&self, state: &FieldState, ctx: &dyn FormContext) -> bool {
        let submitted = state.meta.value.as_deref().unwrap_or_default();
        match self.resolved_value(state, ctx) {
            Some(FieldValue::Bool(checked)) => checked,
            Some(value) => value.contains(submitted),
            None => false,
        }
    }

    fn error<'a>(&self, state: &FieldState, ctx: &'a dyn FormContext) -> Option<&'a str> {
        let name = state.name.as_deref()?.trim_end_matches("[]");
        ctx.errors()?.first(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_kind_names() {
        for kind in RenderKind::ALL {
            assert_eq!(kind.as_str().parse::<RenderKind>().unwrap(), kind);
        }
        assert_eq!(
            "fieldsetOpen".parse::<RenderKind>().unwrap(),
            RenderKind::FieldsetOpen
        );
        assert!("range".parse::<RenderKind>().is_err());
        assert!("Text".parse::<RenderKind>().is_err());
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_html_attrs() {
        let mut attrs = HtmlAttrs::new();
        attrs.set("type", "text");
        attrs.set("class", "form-control");
        attrs.flag("disabled", true);
        attrs.flag("readonly", false);
        attrs.set_opt("placeholder", None::<String>);

        let html = attrs.to_html(html_escape);
        assert_eq!(html, r#" type="text" class="form-control" disabled="disabled""#);
    }

    #[test]
    fn test_html_attrs_merge() {
        let mut attrs = HtmlAttrs::new();
        attrs.set("class", "form-control");
        attrs.set("type", "text");

        let extra: Vec<(String, String)> = vec![
            ("class".to_string(), "wide".to_string()),
            ("type".to_string(), "color".to_string()),
            ("data-id".to_string(), "7".to_string()),
        ];
        attrs.merge(extra.iter().map(|(k, v)| (k, v)));

        assert_eq!(attrs.get("class"), Some("form-control wide"));
        assert_eq!(attrs.get("type"), Some("text"));
        assert_eq!(attrs.get("data-id"), Some("7"));
    }

    #[test]
    fn test_fragment() {
        let fragment = Fragment::new("<hr>");
        assert_eq!(fragment.to_string(), "<hr>");
        assert!(!fragment.is_empty());
        assert!(Fragment::empty().is_empty());
        assert_eq!(String::from(fragment), "<hr>");
    }
}
