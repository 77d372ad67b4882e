//! Accumulated form and field configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FormError;
use crate::render::RenderKind;

/// Label of the single entry `options` falls back to for non-iterable input.
pub const NOT_ITERABLE_LABEL: &str = "Must be iterable";

/// HTTP method a form is submitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Lowercase method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// The method browsers actually submit with: `get` or `post`.
    pub fn form_method(self) -> &'static str {
        match self {
            Self::Get => "get",
            _ => "post",
        }
    }

    /// Whether the method has to be spoofed through a hidden field.
    pub fn is_spoofed(self) -> bool {
        matches!(self, Self::Put | Self::Patch | Self::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            _ => Err(FormError::InvalidMethod(s.to_string())),
        }
    }
}

/// Value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single textual value.
    Text(String),
    /// A flag, used by `checked`.
    Bool(bool),
    /// Several values, used by multiple selects.
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the text if this is a single value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether `candidate` is this value or one of its items.
    pub fn contains(&self, candidate: &str) -> bool {
        match self {
            Self::Text(text) => text == candidate,
            Self::Bool(_) => false,
            Self::List(items) => items.iter().any(|i| i == candidate),
        }
    }

    /// Converts fill data into a value. Objects and null have no value.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Object(_) => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Array(items) => Some(Self::List(items.iter().map(scalar_text).collect())),
            other => Some(Self::Text(scalar_text(other))),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

/// One entry of a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    /// A plain `<option>`.
    Item { value: String, label: String },
    /// An `<optgroup>` of (value, label) pairs.
    Group {
        label: String,
        items: Vec<(String, String)>,
    },
}

impl OptionEntry {
    /// Creates a plain option.
    pub fn item(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Item {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Creates an option group.
    pub fn group(label: impl Into<String>, items: Vec<(impl Into<String>, impl Into<String>)>) -> Self {
        Self::Group {
            label: label.into(),
            items: items
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
        }
    }

    /// The placeholder entry used when options were not iterable.
    pub fn not_iterable() -> Self {
        Self::item("0", NOT_ITERABLE_LABEL)
    }
}

/// Builds select entries from loosely typed data.
///
/// Objects map keys to values and values to labels; a collection under a
/// key becomes a group named by the key. Arrays use the index as the value,
/// except that a `[value, label]` element stands for itself and other
/// nested collections become groups. Anything else yields the single
/// "Must be iterable" entry.
pub fn options_from_json(value: &Value) -> Vec<OptionEntry> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, entry)| keyed_entry(key.clone(), entry))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                Value::Array(pair) if is_pair(pair) => OptionEntry::Item {
                    value: scalar_text(&pair[0]),
                    label: scalar_text(&pair[1]),
                },
                _ => keyed_entry(i.to_string(), entry),
            })
            .collect(),
        _ => vec![OptionEntry::not_iterable()],
    }
}

fn keyed_entry(key: String, entry: &Value) -> OptionEntry {
    match entry {
        Value::Object(_) | Value::Array(_) => OptionEntry::Group {
            label: key,
            items: flat_pairs(entry),
        },
        scalar => OptionEntry::Item {
            value: key,
            label: scalar_text(scalar),
        },
    }
}

/// A `[value, label]` array, which is how tuples serialize.
fn is_pair(items: &[Value]) -> bool {
    items.len() == 2 && items.iter().all(|v| !v.is_object() && !v.is_array())
}

fn flat_pairs(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), scalar_text(v)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), scalar_text(v)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Builds the fill data set.
///
/// Objects bind by key and arrays by index; scalars and null bind nothing.
pub fn data_from_json(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Map::new(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extra data carried for specific render kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    /// Fieldset legend.
    pub legend: Option<String>,
    /// Value a checkbox or radio submits.
    pub value: Option<String>,
}

/// Settings that apply to the whole form and survive field renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSettings {
    /// Prefix prepended to generated ids.
    pub id_prefix: Option<String>,
    /// Whether the form uploads files.
    pub multipart: bool,
    /// Submission method.
    pub method: Option<Method>,
    /// Data filled into the fields by name.
    pub data: Map<String, Value>,
    /// Translation key prefix.
    pub locale: Option<String>,
    /// Inline style for the whole form.
    pub inline_form: bool,
}

/// Everything accumulated by a fluent chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldState {
    /// Form level settings.
    pub form: FormSettings,
    /// Render kind invoked by the next render.
    pub pending: Option<RenderKind>,
    pub input_type: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub value: Option<FieldValue>,
    pub id: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub options: Vec<OptionEntry>,
    pub meta: Meta,
    pub help: Option<String>,
    pub placeholder: Option<String>,
    /// Custom HTML attributes, merged by later calls.
    pub attrs: BTreeMap<String, String>,
    /// Form action or anchor href.
    pub url: Option<String>,
    pub outline: bool,
    pub block: bool,
    pub readonly: bool,
    pub disabled: bool,
    pub multiple: bool,
    /// Inline style for checkboxes and radios.
    pub check_inline: bool,
}

impl FieldState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the field level attributes, keeping form settings.
    pub fn clear_field(&mut self) {
        let form = std::mem::take(&mut self.form);
        *self = Self {
            form,
            ..Self::default()
        };
    }

    /// Drops everything, form settings included.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Whether the pending field is a checkbox or a radio.
    pub fn is_check(&self) -> bool {
        self.pending.is_some_and(RenderKind::is_check)
    }

    /// The value the field submits: the checkbox/radio value, or the
    /// configured text value.
    pub fn submitted_value(&self) -> Option<&str> {
        if self.is_check() {
            return self.meta.value.as_deref();
        }
        self.value.as_ref().and_then(FieldValue::as_text)
    }
}
