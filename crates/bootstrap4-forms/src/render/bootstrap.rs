//! Bootstrap 4 markup for each render kind.

use ironhtml::html;
use ironhtml_elements::Div;

use super::{FormBuilder, HtmlAttrs, RenderKind};
use crate::context::FormContext;
use crate::state::{FieldState, Method, OptionEntry};

impl FormBuilder {
    pub(super) fn form_open(&self, state: &FieldState, ctx: &dyn FormContext) -> String {
        let method = state.form.method.unwrap_or(self.config.method);

        let mut attrs = HtmlAttrs::new();
        attrs.set("method", method.form_method());
        attrs.set_opt("action", state.url.as_deref());
        if state.form.multipart {
            attrs.set("enctype", "multipart/form-data");
        }
        if state.form.inline_form {
            attrs.set("class", "form-inline");
        }
        attrs.set_opt("id", state.id.as_deref());
        attrs.merge(&state.attrs);

        let mut html = format!("<form{}>", attrs.to_html(|s| ctx.escape(s)));

        if method != Method::Get {
            if let Some(token) = ctx.csrf_token() {
                html.push_str(&hidden_input(ctx, &self.config.csrf_field, token));
            }
        }
        if method.is_spoofed() {
            html.push_str(&hidden_input(
                ctx,
                &self.config.method_field,
                &method.as_str().to_uppercase(),
            ));
        }

        html
    }

    pub(super) fn fieldset_open(&self, state: &FieldState, ctx: &dyn FormContext) -> String {
        let mut attrs = HtmlAttrs::new();
        attrs.merge(&state.attrs);

        let legend = state
            .meta
            .legend
            .as_deref()
            .map(|l| format!("<legend>{}</legend>", self.text(state, ctx, l)))
            .unwrap_or_default();

        format!("<fieldset{}>{legend}", attrs.to_html(|s| ctx.escape(s)))
    }

    pub(super) fn input(&self, kind: RenderKind, state: &FieldState, ctx: &dyn FormContext) -> String {
        let id = self.field_id(kind, state);

        let mut attrs = HtmlAttrs::new();
        attrs.set("type", kind.as_str());
        attrs.set_opt("name", state.name.as_deref());
        attrs.set_opt("id", id.as_deref());

        // Secrets and uploads are never echoed back.
        if !matches!(kind, RenderKind::Password | RenderKind::File) {
            let value = self.resolved_value(state, ctx);
            attrs.set_opt("value", value.as_ref().and_then(|v| v.as_text()));
        }

        if kind == RenderKind::Hidden {
            attrs.merge(&state.attrs);
            return format!("<input{}>", attrs.to_html(|s| ctx.escape(s)));
        }

        attrs.set("class", self.control_class(kind, state, ctx));
        attrs.set_opt(
            "placeholder",
            state
                .placeholder
                .as_deref()
                .map(|p| self.translate(state, ctx, p)),
        );
        self.describe(&mut attrs, state, id.as_deref());
        attrs.flag("readonly", state.readonly);
        attrs.flag("disabled", state.disabled);
        attrs.merge(&state.attrs);

        let control = format!("<input{}>", attrs.to_html(|s| ctx.escape(s)));
        self.group(kind, state, ctx, id.as_deref(), &control)
    }

    pub(super) fn select(&self, state: &FieldState, ctx: &dyn FormContext) -> String {
        let kind = RenderKind::Select;
        let id = self.field_id(kind, state);

        let name = state.name.as_deref().map(|n| {
            if state.multiple && !n.ends_with("[]") {
                format!("{n}[]")
            } else {
                n.to_string()
            }
        });

        let mut attrs = HtmlAttrs::new();
        attrs.set_opt("name", name);
        attrs.set_opt("id", id.as_deref());
        attrs.set("class", self.control_class(kind, state, ctx));
        self.describe(&mut attrs, state, id.as_deref());
        attrs.flag("multiple", state.multiple);
        attrs.flag("disabled", state.disabled);
        attrs.merge(&state.attrs);

        let selected = self.resolved_value(state, ctx);
        let is_selected = |v: &str| selected.as_ref().is_some_and(|s| s.contains(v));

        let mut options = String::new();
        if let Some(placeholder) = state.placeholder.as_deref() {
            options.push_str(&format!(
                r#"<option value="">{}</option>"#,
                self.text(state, ctx, placeholder)
            ));
        }
        for entry in &state.options {
            match entry {
                OptionEntry::Item { value, label } => {
                    options.push_str(&option_tag(ctx, value, label, is_selected(value)));
                }
                OptionEntry::Group { label, items } => {
                    options.push_str(&format!(r#"<optgroup label="{}">"#, ctx.escape(label)));
                    for (value, label) in items {
                        options.push_str(&option_tag(ctx, value, label, is_selected(value)));
                    }
                    options.push_str("</optgroup>");
                }
            }
        }

        let control = format!(
            "<select{}>{options}</select>",
            attrs.to_html(|s| ctx.escape(s))
        );
        self.group(kind, state, ctx, id.as_deref(), &control)
    }

    pub(super) fn check(&self, kind: RenderKind, state: &FieldState, ctx: &dyn FormContext) -> String {
        let id = self.field_id(kind, state);

        let mut attrs = HtmlAttrs::new();
        attrs.set("type", kind.as_str());
        attrs.set_opt("name", state.name.as_deref());
        attrs.set_opt("id", id.as_deref());
        attrs.set_opt("value", state.meta.value.as_deref());
        attrs.set("class", self.control_class(kind, state, ctx));
        attrs.flag("checked", self.is_checked(state, ctx));
        self.describe(&mut attrs, state, id.as_deref());
        attrs.flag("disabled", state.disabled);
        attrs.merge(&state.attrs);

        let input = format!("<input{}>", attrs.to_html(|s| ctx.escape(s)));
        let label = self.label(kind, state, ctx, id.as_deref());
        let help = self.help(state, ctx, id.as_deref());
        let error = self.error(state, ctx).map(|m| ctx.escape(m));

        let wrapper_class = if state.check_inline {
            "form-check form-check-inline"
        } else {
            "form-check"
        };

        wrap(wrapper_class, &[&input, &label, &help], error.as_deref())
    }

    pub(super) fn textarea(&self, state: &FieldState, ctx: &dyn FormContext) -> String {
        let kind = RenderKind::Textarea;
        let id = self.field_id(kind, state);

        let mut attrs = HtmlAttrs::new();
        attrs.set_opt("name", state.name.as_deref());
        attrs.set_opt("id", id.as_deref());
        attrs.set("class", self.control_class(kind, state, ctx));
        attrs.set_opt("rows", self.config.textarea_rows.map(|r| r.to_string()));
        attrs.set_opt(
            "placeholder",
            state
                .placeholder
                .as_deref()
                .map(|p| self.translate(state, ctx, p)),
        );
        self.describe(&mut attrs, state, id.as_deref());
        attrs.flag("readonly", state.readonly);
        attrs.flag("disabled", state.disabled);
        attrs.merge(&state.attrs);

        let content = self
            .resolved_value(state, ctx)
            .as_ref()
            .and_then(|v| v.as_text())
            .map(|v| ctx.escape(v))
            .unwrap_or_default();

        let control = format!(
            "<textarea{}>{content}</textarea>",
            attrs.to_html(|s| ctx.escape(s))
        );
        self.group(kind, state, ctx, id.as_deref(), &control)
    }

    pub(super) fn button(&self, kind: RenderKind, state: &FieldState, ctx: &dyn FormContext) -> String {
        let button_type = match kind {
            RenderKind::Submit => "submit",
            RenderKind::Reset => "reset",
            _ => "button",
        };

        let mut attrs = HtmlAttrs::new();
        attrs.set("type", button_type);
        attrs.set_opt("name", state.name.as_deref());
        attrs.set_opt("id", state.id.as_deref());
        attrs.set("class", self.button_class(state));
        attrs.flag("disabled", state.disabled);
        attrs.merge(&state.attrs);

        format!(
            "<button{}>{}</button>",
            attrs.to_html(|s| ctx.escape(s)),
            self.button_text(state, ctx)
        )
    }

    pub(super) fn anchor(&self, state: &FieldState, ctx: &dyn FormContext) -> String {
        let mut class = self.button_class(state);
        if state.disabled {
            class.push_str(" disabled");
        }

        let mut attrs = HtmlAttrs::new();
        attrs.set("href", state.url.as_deref().unwrap_or("#"));
        attrs.set_opt("id", state.id.as_deref());
        attrs.set("class", class);
        attrs.set("role", "button");
        if state.disabled {
            attrs.set("aria-disabled", "true");
        }
        attrs.merge(&state.attrs);

        format!(
            "<a{}>{}</a>",
            attrs.to_html(|s| ctx.escape(s)),
            self.button_text(state, ctx)
        )
    }

    /// Wraps a control with its label, help text and error in a form group.
    fn group(
        &self,
        kind: RenderKind,
        state: &FieldState,
        ctx: &dyn FormContext,
        id: Option<&str>,
        control: &str,
    ) -> String {
        let label = self.label(kind, state, ctx, id);
        let help = self.help(state, ctx, id);
        let error = self.error(state, ctx).map(|m| ctx.escape(m));

        let wrapper_class = if state.form.inline_form {
            "form-group mb-2 mr-sm-2"
        } else {
            "form-group"
        };

        wrap(wrapper_class, &[&label, control, &help], error.as_deref())
    }

    fn label(
        &self,
        kind: RenderKind,
        state: &FieldState,
        ctx: &dyn FormContext,
        id: Option<&str>,
    ) -> String {
        let Some(label) = state.label.as_deref() else {
            return String::new();
        };

        let mut attrs = HtmlAttrs::new();
        attrs.set_opt("for", id);
        if kind.is_check() {
            attrs.set("class", "form-check-label");
        } else if state.form.inline_form {
            attrs.set("class", "mr-sm-2");
        }

        format!(
            "<label{}>{}</label>",
            attrs.to_html(|s| ctx.escape(s)),
            self.text(state, ctx, label)
        )
    }

    fn help(&self, state: &FieldState, ctx: &dyn FormContext, id: Option<&str>) -> String {
        let Some(help) = state.help.as_deref() else {
            return String::new();
        };

        let mut attrs = HtmlAttrs::new();
        attrs.set_opt("id", id.map(|id| format!("help-{id}")));
        attrs.set("class", "form-text text-muted");

        format!(
            "<small{}>{}</small>",
            attrs.to_html(|s| ctx.escape(s)),
            self.text(state, ctx, help)
        )
    }

    /// Points `aria-describedby` at the help text.
    fn describe(&self, attrs: &mut HtmlAttrs, state: &FieldState, id: Option<&str>) {
        if state.help.is_some() {
            attrs.set_opt("aria-describedby", id.map(|id| format!("help-{id}")));
        }
    }

    fn control_class(&self, kind: RenderKind, state: &FieldState, ctx: &dyn FormContext) -> String {
        let mut class = match kind {
            RenderKind::File => "form-control-file".to_string(),
            RenderKind::Checkbox | RenderKind::Radio => "form-check-input".to_string(),
            _ => "form-control".to_string(),
        };

        if let Some(size) = &state.size {
            if !kind.is_check() && kind != RenderKind::File {
                class.push_str(&format!(" form-control-{size}"));
            }
        }

        if self.error(state, ctx).is_some() {
            class.push_str(" is-invalid");
        }

        class
    }

    fn button_class(&self, state: &FieldState) -> String {
        let color = state.color.as_deref().unwrap_or(&self.config.button_color);
        let mut class = if state.outline {
            format!("btn btn-outline-{color}")
        } else {
            format!("btn btn-{color}")
        };

        if let Some(size) = &state.size {
            class.push_str(&format!(" btn-{size}"));
        }
        if state.block {
            class.push_str(" btn-block");
        }

        class
    }

    fn button_text(&self, state: &FieldState, ctx: &dyn FormContext) -> String {
        state
            .value
            .as_ref()
            .and_then(|v| v.as_text())
            .map(|v| self.text(state, ctx, v))
            .unwrap_or_default()
    }
}

/// A wrapper `div` around rendered parts, closed by the invalid feedback of
/// the field's first error.
fn wrap(class: &str, parts: &[&str], error: Option<&str>) -> String {
    parts
        .iter()
        .fold(html! { div.class(#class) }, |d, part| d.raw(*part))
        .when(error.is_some(), |d| {
            d.child::<Div, _>(|e| e.class("invalid-feedback").raw(error.unwrap_or("")))
        })
        .render()
}

fn hidden_input(ctx: &dyn FormContext, name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        ctx.escape(name),
        ctx.escape(value)
    )
}

fn option_tag(ctx: &dyn FormContext, value: &str, label: &str, selected: bool) -> String {
    let selected_attr = if selected { " selected" } else { "" };
    format!(
        r#"<option value="{}"{selected_attr}>{}</option>"#,
        ctx.escape(value),
        ctx.escape(label)
    )
}
