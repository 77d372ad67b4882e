//! # bootstrap4-forms
//!
//! Fluent builder for Bootstrap 4 form markup.
//!
//! This crate provides:
//! - A chainable [`FormService`] that accumulates form and field settings
//! - Rendering of forms, fieldsets, inputs, selects, checkboxes, radios,
//!   textareas, buttons and button-styled links
//! - A [`FormContext`] seam for the host's URL generation, translations,
//!   escaping, CSRF token, previous input and validation errors
//!
//! ## Quick Start
//!
//! ```rust
//! use bootstrap4_forms::{FormService, StaticContext};
//! use serde_json::json;
//!
//! let ctx = StaticContext::new()
//!     .with_route("users.update", "/users/{id}")
//!     .with_csrf_token("secret");
//! let mut form = FormService::with_context(ctx);
//!
//! let mut html = String::new();
//! let open = form
//!     .open()
//!     .put()
//!     .route("users.update", &[("id", "7")])
//!     .fill(&json!({"name": "Neto", "role": "admin"}))
//!     .render();
//! html.push_str(open.as_str());
//! html.push_str(form.text("name").label("Name").render().as_str());
//! html.push_str(
//!     form.select("role", &json!({"user": "User", "admin": "Administrator"}))
//!         .label("Role")
//!         .render()
//!         .as_str(),
//! );
//! html.push_str(form.checkbox("active", None).label("Active").checked(true).render().as_str());
//! html.push_str(form.submit("Save").success().render().as_str());
//! html.push_str(form.close().render().as_str());
//!
//! assert!(html.contains(r#"action="/users/7""#));
//! assert!(html.contains(r#"name="_method" value="PUT""#));
//! assert!(html.contains(r#"value="Neto""#));
//! assert!(html.contains(r#"<option value="admin" selected>Administrator</option>"#));
//! assert!(html.contains(r#"class="btn btn-success""#));
//! ```
//!
//! ## Rendering
//!
//! Setters only record configuration. [`FormService::render`] renders the
//! fragment selected by the last render-kind setter and resets the field
//! settings; form settings such as the method or fill data stay until the
//! form is closed. Without a selected kind the fragment is empty.
//!
//! ## Permissive input
//!
//! The fluent API does not fail. Fill data that is neither an object nor a
//! sequence binds nothing, select options that are not a collection become a single
//! "Must be iterable" entry, unknown render kinds render nothing and
//! unknown routes leave the url unset. Each case is logged with `tracing`.

mod config;
mod context;
mod error;
pub mod render;
mod service;
pub mod state;

pub use config::FormConfig;
pub use context::{FormContext, StaticContext};
pub use error::{FormError, Result, ValidationErrors};
pub use render::{Fragment, RenderKind};
pub use service::FormService;
pub use state::{FieldState, FieldValue, Method, OptionEntry};
