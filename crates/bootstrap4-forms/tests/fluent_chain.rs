//! End-to-end tests for fluent chains.

use bootstrap4_forms::state::NOT_ITERABLE_LABEL;
use bootstrap4_forms::{
    FieldValue, FormConfig, FormContext, FormService, OptionEntry, StaticContext,
    ValidationErrors,
};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct User {
    name: String,
    email: String,
    role: String,
    newsletter: bool,
    tags: Vec<String>,
}

fn user() -> User {
    User {
        name: "Neto".to_string(),
        email: "neto@example.com".to_string(),
        role: "admin".to_string(),
        newsletter: true,
        tags: vec!["rust".to_string(), "web".to_string()],
    }
}

#[test]
fn text_chain_renders_name_value_and_label() {
    let mut form = FormService::new();
    let html = form.text("n").label("L").value("v").render();

    assert!(html.as_str().contains(r#"type="text""#));
    assert!(html.as_str().contains(r#"name="n""#));
    assert!(html.as_str().contains(r#"value="v""#));
    assert!(html.as_str().contains(">L</label>"));
    assert_eq!(html.as_str().matches("<input").count(), 1);
}

#[test]
fn unconfigured_service_renders_nothing() {
    let mut form = FormService::new();
    assert_eq!(form.render().as_str(), "");

    form.label("orphan").value("x");
    assert_eq!(form.render().as_str(), "");

    form.render_as("datetime");
    assert_eq!(form.render().as_str(), "");
}

#[test]
fn checkbox_without_value_submits_its_name() {
    let mut form = FormService::new();
    form.checkbox("a", None);
    assert_eq!(form.state().submitted_value(), Some("a"));

    let html = form.render();
    assert!(html.as_str().contains(r#"value="a""#));
    assert!(!html.as_str().contains("checked"));
}

#[test]
fn checked_radio_stores_its_value() {
    let mut form = FormService::new();
    form.radio("g", Some("x")).checked(true);
    assert_eq!(form.state().value, Some(FieldValue::from("x")));
    assert_ne!(form.state().value, Some(FieldValue::Bool(true)));

    let html = form.render();
    assert!(html.as_str().contains(r#"checked="checked""#));
    assert!(html.as_str().contains(r#"id="g-x""#));
}

#[test]
fn fill_binds_objects_and_sequences_only() {
    let mut form = FormService::new();

    form.fill(&vec!["a", "b"]);
    assert_eq!(form.state().form.data.len(), 2);
    assert_eq!(form.state().form.data["0"], json!("a"));

    form.fill(&42);
    assert!(form.state().form.data.is_empty());

    form.fill("text");
    assert!(form.state().form.data.is_empty());

    form.fill(&Option::<User>::None);
    assert!(form.state().form.data.is_empty());

    form.fill(&user());
    assert_eq!(form.state().form.data.len(), 5);
}

#[test]
fn non_iterable_options_become_placeholder() {
    let mut form = FormService::new();
    for input in [json!(1), json!("nope"), json!(null), json!(true)] {
        form.select("x", &input);
        assert_eq!(
            form.state().options,
            vec![OptionEntry::item("0", NOT_ITERABLE_LABEL)]
        );
    }

    let html = form.render();
    assert!(html.as_str().contains(">Must be iterable</option>"));
}

#[test]
fn keyed_collections_render_as_groups() {
    let mut form = FormService::new();
    let html = form
        .select(
            "fruit",
            &json!({"Fruits": ["Apple", "Banana"], "Veg": ["Kale", "Leek", "Pea"]}),
        )
        .render();

    assert!(html.as_str().contains(r#"<optgroup label="Fruits"><option value="0">Apple</option><option value="1">Banana</option></optgroup>"#));
    assert!(html.as_str().contains(r#"<optgroup label="Veg">"#));
}

#[test]
fn filled_struct_populates_fields() {
    let mut form = FormService::new();
    form.open().fill(&user()).render();

    let name = form.text("name").render();
    assert!(name.as_str().contains(r#"value="Neto""#));

    let email = form.email("email").render();
    assert!(email.as_str().contains(r#"value="neto@example.com""#));

    let role = form
        .select("role", &json!({"user": "User", "admin": "Admin"}))
        .render();
    assert!(role.as_str().contains(r#"<option value="admin" selected>Admin</option>"#));
    assert!(role.as_str().contains(r#"<option value="user">User</option>"#));

    let newsletter = form.checkbox("newsletter", None).render();
    assert!(newsletter.as_str().contains(r#"checked="checked""#));

    let tags = form
        .select("tags", &[("rust", "Rust"), ("go", "Go"), ("web", "Web")])
        .multiple(true)
        .render();
    assert!(tags.as_str().contains(r#"name="tags[]""#));
    assert!(tags.as_str().contains(r#"<option value="rust" selected>"#));
    assert!(tags.as_str().contains(r#"<option value="go">"#));
    assert!(tags.as_str().contains(r#"<option value="web" selected>"#));

    form.close().render();
    let after_close = form.text("name").render();
    assert!(!after_close.as_str().contains("Neto"));
}

#[test]
fn stale_field_attributes_do_not_leak() {
    let mut form = FormService::new();
    form.text("first")
        .label("First")
        .placeholder("p")
        .help("h")
        .lg()
        .readonly(true)
        .render();

    let html = form.select("second", &json!({"a": "A"})).render();
    assert!(!html.as_str().contains("First"));
    assert!(!html.as_str().contains("placeholder"));
    assert!(!html.as_str().contains("form-text"));
    assert!(!html.as_str().contains("form-control-lg"));
    assert!(!html.as_str().contains("readonly"));
}

#[test]
fn full_form_with_context() {
    let ctx = StaticContext::new()
        .with_base_url("https://app.test")
        .with_route("profile.update", "/profile/{id}")
        .with_csrf_token("tok123")
        .with_translation("profile.name", "Nome")
        .with_translation("profile.save", "Salvar")
        .with_errors(ValidationErrors::new().with("name", "Name is required"));
    let mut form = FormService::with_context(ctx).with_config(FormConfig::new().id_prefix("inp-"));

    let open = form
        .open()
        .patch()
        .multipart(true)
        .locale("profile")
        .route("profile.update", &[("id", "3")])
        .render();
    assert!(open.as_str().starts_with(
        r#"<form method="post" action="https://app.test/profile/3" enctype="multipart/form-data">"#
    ));
    assert!(open.as_str().contains(r#"name="_token" value="tok123""#));
    assert!(open.as_str().contains(r#"name="_method" value="PATCH""#));

    let fieldset = form.fieldset_open(Some("name")).render();
    assert_eq!(fieldset.as_str(), "<fieldset><legend>Nome</legend>");

    let name = form.text("name").label("name").render();
    assert!(name.as_str().contains(r#"<label for="inp-name">Nome</label>"#));
    assert!(name.as_str().contains(r#"id="inp-name""#));
    assert!(name.as_str().contains("is-invalid"));
    assert!(name.as_str().contains(r#"<div class="invalid-feedback">Name is required</div>"#));

    let avatar = form.file("avatar").render();
    assert!(avatar.as_str().contains(r#"class="form-control-file""#));
    assert!(!avatar.as_str().contains("is-invalid"));

    assert_eq!(form.fieldset_close().render().as_str(), "</fieldset>");

    let save = form.submit("save").block(true).render();
    assert_eq!(
        save.as_str(),
        r#"<button type="submit" class="btn btn-primary btn-block">Salvar</button>"#
    );

    let cancel = form.anchor("Cancel", Some("/profile")).secondary().outline(true).render();
    assert_eq!(
        cancel.as_str(),
        r#"<a href="https://app.test/profile" class="btn btn-outline-secondary" role="button">Cancel</a>"#
    );

    assert_eq!(form.close().render().as_str(), "</form>");
}

#[test]
fn old_input_overrides_fill_data() {
    let ctx = StaticContext::new()
        .with_old_input("name", "Typed")
        .with_old_input("plan", "pro");
    let mut form = FormService::with_context(ctx);
    form.open().fill(&json!({"name": "Stored", "plan": "free", "agree": "agree"})).render();

    let name = form.text("name").render();
    assert!(name.as_str().contains(r#"value="Typed""#));

    let pro = form.radio("plan", Some("pro")).render();
    assert!(pro.as_str().contains(r#"checked="checked""#));
    let free = form.radio("plan", Some("free")).render();
    assert!(!free.as_str().contains("checked=\""));

    // Absent from the submission means unchecked.
    let agree = form.checkbox("agree", None).render();
    assert!(!agree.as_str().contains("checked=\""));
}

struct UppercaseHost;

impl FormContext for UppercaseHost {
    fn translate(&self, key: &str) -> String {
        key.to_uppercase()
    }
}

#[test]
fn host_context_supplies_translations() {
    let mut form = FormService::with_context(UppercaseHost);
    let html = form.button("ok").render();
    assert_eq!(
        html.as_str(),
        r#"<button type="button" class="btn btn-primary">OK</button>"#
    );

    form.open().route("missing", &[]);
    assert!(form.state().url.is_none());
    assert_eq!(form.render().as_str(), r#"<form method="post">"#);
}
