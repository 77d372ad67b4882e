//! The fluent form facade.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::FormConfig;
use crate::context::{FormContext, StaticContext};
use crate::render::{FormBuilder, Fragment, RenderKind};
use crate::state::{
    data_from_json, options_from_json, FieldState, FieldValue, Method, OptionEntry,
};

/// Chainable builder of Bootstrap 4 form markup.
///
/// Setters record configuration and the kind of fragment to render next;
/// [`FormService::render`] produces the fragment. After a render the field
/// configuration is reset while form settings (method, fill data, locale,
/// id prefix, inline form) are kept until the form is closed.
///
/// ```
/// use bootstrap4_forms::FormService;
///
/// let mut form = FormService::new();
/// let open = form.open().put().url("/posts/1").render();
/// assert!(open.as_str().contains(r#"value="PUT""#));
///
/// let title = form.text("title").label("Title").value("Hello").render();
/// assert!(title.as_str().contains(r#"value="Hello""#));
///
/// assert_eq!(form.close().render().as_str(), "</form>");
/// ```
#[derive(Debug)]
pub struct FormService<C = StaticContext> {
    builder: FormBuilder,
    state: FieldState,
    context: C,
}

impl FormService<StaticContext> {
    /// Creates a service with an empty [`StaticContext`].
    pub fn new() -> Self {
        Self::with_context(StaticContext::new())
    }
}

impl Default for FormService<StaticContext> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FormContext> FormService<C> {
    /// Creates a service backed by the host's collaborators.
    pub fn with_context(context: C) -> Self {
        Self {
            builder: FormBuilder::default(),
            state: FieldState::new(),
            context,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.builder = FormBuilder::new(config);
        self
    }

    /// The accumulated state.
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    /// The kind the next render produces.
    pub fn pending(&self) -> Option<RenderKind> {
        self.state.pending
    }

    /// The host collaborators.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the host collaborators.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// The active configuration.
    pub fn config(&self) -> &FormConfig {
        self.builder.config()
    }

    /// Renders the pending fragment.
    ///
    /// Without a pending kind the fragment is empty and nothing is reset.
    pub fn render(&mut self) -> Fragment {
        let Some(kind) = self.state.pending else {
            debug!("render called without a pending render kind");
            return Fragment::empty();
        };

        let html = self.builder.render(kind, &self.state, &self.context);
        trace!(%kind, bytes = html.len(), "rendered form fragment");

        if kind == RenderKind::Close {
            self.state.clear_all();
        } else {
            self.state.clear_field();
        }

        Fragment::new(html)
    }

    /// Selects the render kind by name. Unknown names render nothing.
    pub fn render_as(&mut self, kind: &str) -> &mut Self {
        self.state.pending = match kind.parse::<RenderKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                debug!(error = %e, "render kind ignored");
                None
            }
        };
        self
    }

    fn pending_kind(&mut self, kind: RenderKind) -> &mut Self {
        self.state.pending = Some(kind);
        self
    }

    // Form level

    /// Opens the form.
    pub fn open(&mut self) -> &mut Self {
        self.pending_kind(RenderKind::Open)
    }

    /// Closes the form and, once rendered, forgets all settings.
    pub fn close(&mut self) -> &mut Self {
        self.pending_kind(RenderKind::Close)
    }

    /// Prefix for all generated ids.
    pub fn id_prefix(&mut self, prefix: &str) -> &mut Self {
        self.state.form.id_prefix = Some(prefix.to_string());
        self
    }

    /// Marks the form as uploading files.
    pub fn multipart(&mut self, multipart: bool) -> &mut Self {
        self.state.form.multipart = multipart;
        self
    }

    /// Sets the submission method.
    pub fn method(&mut self, method: Method) -> &mut Self {
        self.state.form.method = Some(method);
        self
    }

    /// Submits with GET.
    pub fn get(&mut self) -> &mut Self {
        self.method(Method::Get)
    }

    /// Submits with POST.
    pub fn post(&mut self) -> &mut Self {
        self.method(Method::Post)
    }

    /// Submits with PUT, spoofed through a hidden field.
    pub fn put(&mut self) -> &mut Self {
        self.method(Method::Put)
    }

    /// Submits with PATCH, spoofed through a hidden field.
    pub fn patch(&mut self) -> &mut Self {
        self.method(Method::Patch)
    }

    /// Submits with DELETE, spoofed through a hidden field.
    pub fn delete(&mut self) -> &mut Self {
        self.method(Method::Delete)
    }

    /// Binds data whose entries fill the fields by name.
    ///
    /// Objects bind by key and sequences by index. Anything else binds an
    /// empty set.
    pub fn fill<T: Serialize + ?Sized>(&mut self, data: &T) -> &mut Self {
        let data = match serde_json::to_value(data) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => data_from_json(value),
            Ok(other) => {
                debug!(kind = json_kind(&other), "fill data is not a collection, ignoring");
                data_from_json(other)
            }
            Err(e) => {
                debug!(error = %e, "fill data could not be serialized, ignoring");
                data_from_json(Value::Null)
            }
        };
        self.state.form.data = data;
        self
    }

    /// Prefix for translation keys.
    pub fn locale(&mut self, locale: &str) -> &mut Self {
        self.state.form.locale = Some(locale.to_string());
        self
    }

    /// Inline style for checkboxes and radios.
    pub fn inline(&mut self, inline: bool) -> &mut Self {
        self.state.check_inline = inline;
        self
    }

    /// Inline style for the whole form.
    pub fn inline_form(&mut self, inline: bool) -> &mut Self {
        self.state.form.inline_form = inline;
        self
    }

    /// Form action or anchor href, from a path.
    pub fn url(&mut self, path: &str) -> &mut Self {
        self.state.url = Some(self.context.url(path));
        self
    }

    /// Form action or anchor href, from a named route.
    pub fn route(&mut self, name: &str, params: &[(&str, &str)]) -> &mut Self {
        self.state.url = match self.context.route(name, params) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(route = name, error = %e, "could not generate route url");
                None
            }
        };
        self
    }

    /// Opens a fieldset, with a legend when given.
    pub fn fieldset_open(&mut self, legend: Option<&str>) -> &mut Self {
        self.state.meta.legend = legend.map(str::to_string);
        self.pending_kind(RenderKind::FieldsetOpen)
    }

    /// Closes the fieldset.
    pub fn fieldset_close(&mut self) -> &mut Self {
        self.pending_kind(RenderKind::FieldsetClose)
    }

    // Fields

    fn field(&mut self, kind: RenderKind, name: &str) -> &mut Self {
        self.state.input_type = Some(kind.as_str().to_string());
        self.state.name = Some(name.to_string());
        self.pending_kind(kind)
    }

    /// A file upload input.
    pub fn file(&mut self, name: &str) -> &mut Self {
        self.field(RenderKind::File, name)
    }

    /// A text input.
    pub fn text(&mut self, name: &str) -> &mut Self {
        self.field(RenderKind::Text, name)
    }

    /// A password input. Its value is never echoed.
    pub fn password(&mut self, name: &str) -> &mut Self {
        self.field(RenderKind::Password, name)
    }

    /// An email input.
    pub fn email(&mut self, name: &str) -> &mut Self {
        self.field(RenderKind::Email, name)
    }

    /// A number input.
    pub fn number(&mut self, name: &str) -> &mut Self {
        self.field(RenderKind::Number, name)
    }

    /// A hidden input, rendered without a wrapper.
    pub fn hidden(&mut self, name: &str) -> &mut Self {
        self.field(RenderKind::Hidden, name)
    }

    /// A textarea.
    pub fn textarea(&mut self, name: &str) -> &mut Self {
        self.field(RenderKind::Textarea, name)
    }

    /// A select with the given options. See [`FormService::options`].
    pub fn select<T: Serialize + ?Sized>(&mut self, name: &str, options: &T) -> &mut Self {
        self.options(options).field(RenderKind::Select, name)
    }

    /// Sets select options from loosely typed data.
    ///
    /// Input that is neither an object nor an array yields a single
    /// "Must be iterable" entry.
    pub fn options<T: Serialize + ?Sized>(&mut self, options: &T) -> &mut Self {
        let entries = match serde_json::to_value(options) {
            Ok(value) => {
                if !matches!(value, Value::Object(_) | Value::Array(_)) {
                    debug!(kind = json_kind(&value), "select options are not iterable");
                }
                options_from_json(&value)
            }
            Err(e) => {
                debug!(error = %e, "select options could not be serialized");
                vec![OptionEntry::not_iterable()]
            }
        };
        self.option_entries(entries)
    }

    /// Sets select options.
    pub fn option_entries(&mut self, entries: Vec<OptionEntry>) -> &mut Self {
        self.state.options = entries;
        self
    }

    /// A checkbox submitting `value`, or its name when no value is given.
    pub fn checkbox(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.check(RenderKind::Checkbox, name, value)
    }

    /// A radio submitting `value`, or its name when no value is given.
    pub fn radio(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.check(RenderKind::Radio, name, value)
    }

    fn check(&mut self, kind: RenderKind, name: &str, value: Option<&str>) -> &mut Self {
        self.state.meta.value = Some(value.unwrap_or(name).to_string());
        self.field(kind, name)
    }

    /// Flags a checkbox or radio as checked.
    ///
    /// A checked radio stores its own value so it compares like submitted
    /// input.
    pub fn checked(&mut self, checked: bool) -> &mut Self {
        let value = match (&self.state.pending, &self.state.meta.value) {
            (Some(RenderKind::Radio), Some(own)) if checked => FieldValue::Text(own.clone()),
            _ => FieldValue::Bool(checked),
        };
        self.value(value)
    }

    // Buttons

    /// A plain button labelled `value`.
    pub fn button(&mut self, value: &str) -> &mut Self {
        self.value(value).pending_kind(RenderKind::Button)
    }

    /// A submit button labelled `value`.
    pub fn submit(&mut self, value: &str) -> &mut Self {
        self.value(value).pending_kind(RenderKind::Submit)
    }

    /// A reset button labelled `value`.
    pub fn reset(&mut self, value: &str) -> &mut Self {
        self.value(value).pending_kind(RenderKind::Reset)
    }

    /// A link styled as a button.
    pub fn anchor(&mut self, value: &str, url: Option<&str>) -> &mut Self {
        if let Some(url) = url {
            self.url(url);
        }
        self.value(value).pending_kind(RenderKind::Anchor)
    }

    // Attributes

    /// Sets the label text.
    pub fn label(&mut self, label: &str) -> &mut Self {
        self.state.label = Some(label.to_string());
        self
    }

    /// Sets the field value.
    pub fn value(&mut self, value: impl Into<FieldValue>) -> &mut Self {
        self.state.value = Some(value.into());
        self
    }

    /// Sets the input type, which also selects the render kind.
    pub fn input_type(&mut self, input_type: &str) -> &mut Self {
        self.state.input_type = Some(input_type.to_string());
        self.render_as(input_type)
    }

    /// Sets the id, overriding the generated one.
    pub fn id(&mut self, id: &str) -> &mut Self {
        self.state.id = Some(id.to_string());
        self
    }

    /// Sets the field name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.state.name = Some(name.to_string());
        self
    }

    /// Sets the help text below the field.
    pub fn help(&mut self, text: &str) -> &mut Self {
        self.state.help = Some(text.to_string());
        self
    }

    /// Sets the placeholder; on a select it becomes a leading empty option.
    pub fn placeholder(&mut self, placeholder: &str) -> &mut Self {
        self.state.placeholder = Some(placeholder.to_string());
        self
    }

    /// Sets the control size (`lg` or `sm`).
    pub fn size(&mut self, size: &str) -> &mut Self {
        self.state.size = Some(size.to_string());
        self
    }

    /// Large control or button.
    pub fn lg(&mut self) -> &mut Self {
        self.size("lg")
    }

    /// Small control or button.
    pub fn sm(&mut self) -> &mut Self {
        self.size("sm")
    }

    /// Sets the button color.
    pub fn color(&mut self, color: &str) -> &mut Self {
        self.state.color = Some(color.to_string());
        self
    }

    /// `primary` button color.
    pub fn primary(&mut self) -> &mut Self {
        self.color("primary")
    }

    /// `secondary` button color.
    pub fn secondary(&mut self) -> &mut Self {
        self.color("secondary")
    }

    /// `success` button color.
    pub fn success(&mut self) -> &mut Self {
        self.color("success")
    }

    /// `danger` button color.
    pub fn danger(&mut self) -> &mut Self {
        self.color("danger")
    }

    /// `warning` button color.
    pub fn warning(&mut self) -> &mut Self {
        self.color("warning")
    }

    /// `info` button color.
    pub fn info(&mut self) -> &mut Self {
        self.color("info")
    }

    /// `light` button color.
    pub fn light(&mut self) -> &mut Self {
        self.color("light")
    }

    /// `dark` button color.
    pub fn dark(&mut self) -> &mut Self {
        self.color("dark")
    }

    /// `link` button color.
    pub fn link(&mut self) -> &mut Self {
        self.color("link")
    }

    /// Outline button style.
    pub fn outline(&mut self, outline: bool) -> &mut Self {
        self.state.outline = outline;
        self
    }

    /// Full-width button.
    pub fn block(&mut self, block: bool) -> &mut Self {
        self.state.block = block;
        self
    }

    /// Marks the field read-only.
    pub fn readonly(&mut self, readonly: bool) -> &mut Self {
        self.state.readonly = readonly;
        self
    }

    /// Disables the field or button.
    pub fn disabled(&mut self, disabled: bool) -> &mut Self {
        self.state.disabled = disabled;
        self
    }

    /// Lets a select take several values.
    pub fn multiple(&mut self, multiple: bool) -> &mut Self {
        self.state.multiple = multiple;
        self
    }

    /// Adds custom attributes; later keys overwrite earlier ones.
    pub fn attrs<I, K, V>(&mut self, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.state
            .attrs
            .extend(attrs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds one custom attribute.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        self.attrs([(key, value)])
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NOT_ITERABLE_LABEL;
    use serde_json::json;

    #[test]
    fn test_checkbox_value_defaults_to_name() {
        let mut form = FormService::new();
        form.checkbox("a", None);
        assert_eq!(form.state().submitted_value(), Some("a"));
        assert_eq!(form.state().meta.value.as_deref(), Some("a"));

        form.checkbox("b", Some("yes"));
        assert_eq!(form.state().submitted_value(), Some("yes"));
    }

    #[test]
    fn test_checked_radio_stores_own_value() {
        let mut form = FormService::new();
        form.radio("g", Some("x")).checked(true);
        assert_eq!(form.state().value, Some(FieldValue::from("x")));

        form.checkbox("c", None).checked(true);
        assert_eq!(form.state().value, Some(FieldValue::Bool(true)));

        form.radio("g", Some("x")).checked(false);
        assert_eq!(form.state().value, Some(FieldValue::Bool(false)));
    }

    #[test]
    fn test_fill_scalar_is_empty() {
        let mut form = FormService::new();
        for input in [json!("abc"), json!(null), json!(12), json!(false)] {
            form.fill(&json!({"seed": 1}));
            form.fill(&input);
            assert!(form.state().form.data.is_empty(), "{input}");
        }
    }

    #[test]
    fn test_fill_sequence_binds_by_index() {
        let mut form = FormService::new();
        form.open().fill(&["first", "second"]).render();
        assert_eq!(form.state().form.data.len(), 2);

        let html = form.text("1").render();
        assert!(html.as_str().contains(r#"value="second""#));
    }

    #[test]
    fn test_fill_unserializable_is_empty() {
        use std::collections::HashMap;

        // Non-string map keys cannot become JSON object keys.
        let mut data = HashMap::new();
        data.insert((1, 2), "x");

        let mut form = FormService::new();
        form.fill(&data);
        assert!(form.state().form.data.is_empty());
    }

    #[test]
    fn test_options_not_iterable() {
        let mut form = FormService::new();
        for input in [json!(5), json!("x"), json!(null), json!(false)] {
            form.options(&input);
            assert_eq!(form.state().options.len(), 1);
            assert_eq!(
                form.state().options[0],
                OptionEntry::item("0", NOT_ITERABLE_LABEL)
            );
        }
    }

    #[test]
    fn test_options_from_pairs() {
        let mut form = FormService::new();
        let expected = vec![OptionEntry::item("rs", "Rust"), OptionEntry::item("go", "Go")];

        form.select("lang", &[("rs", "Rust"), ("go", "Go")]);
        assert_eq!(form.state().options, expected);

        form.select("lang", &json!({"rs": "Rust", "go": "Go"}));
        assert_eq!(form.state().options, expected);
    }

    #[test]
    fn test_render_without_pending_is_empty() {
        let mut form = FormService::new();
        assert!(form.render().is_empty());

        form.text("name").render_as("range");
        assert_eq!(form.pending(), None);
        assert!(form.render().is_empty());

        form.input_type("colour");
        assert!(form.render().is_empty());
    }

    #[test]
    fn test_render_resets_field_but_keeps_form() {
        let mut form = FormService::new();
        form.open().put().locale("forms").fill(&json!({"a": "1"}));
        form.render();
        assert_eq!(form.pending(), None);

        form.text("a").label("A").attr("data-x", "1").disabled(true);
        form.render();
        let state = form.state();
        assert!(state.name.is_none());
        assert!(state.label.is_none());
        assert!(state.attrs.is_empty());
        assert!(!state.disabled);
        assert_eq!(state.form.method, Some(Method::Put));
        assert_eq!(state.form.locale.as_deref(), Some("forms"));
        assert_eq!(state.form.data.len(), 1);

        form.close().render();
        assert_eq!(form.state(), &FieldState::default());
    }

    #[test]
    fn test_attrs_are_additive() {
        let mut form = FormService::new();
        form.text("n")
            .attrs([("data-a", "1"), ("data-b", "2")])
            .attrs([("data-b", "3")])
            .attr("data-c", "4");

        let attrs = &form.state().attrs;
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs["data-b"], "3");
    }

    #[test]
    fn test_input_type_selects_render_kind() {
        let mut form = FormService::new();
        form.name("age").input_type("number");
        assert_eq!(form.pending(), Some(RenderKind::Number));
        assert!(form.render().as_str().contains(r#"type="number""#));
    }

    #[test]
    fn test_unknown_route_leaves_no_url() {
        let ctx = StaticContext::new().with_route("home", "/");
        let mut form = FormService::with_context(ctx);

        form.open().route("missing", &[]);
        assert!(form.state().url.is_none());

        form.route("home", &[]);
        assert_eq!(form.state().url.as_deref(), Some("/"));
    }

    #[test]
    fn test_anchor_with_url() {
        let ctx = StaticContext::new().with_base_url("https://example.com");
        let mut form = FormService::with_context(ctx);
        let html = form.anchor("Home", Some("/")).info().render();
        assert_eq!(
            html.as_str(),
            r#"<a href="https://example.com/" class="btn btn-info" role="button">Home</a>"#
        );
    }
}
