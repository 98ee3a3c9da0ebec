//! Tera templates, embedded at compile time.

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use crate::SiteError;

pub const APP: &str = "catalog/app.html";
pub const APPS: &str = "catalog/apps.html";
pub const DETAILS: &str = "catalog/details.html";
pub const APP_STORE: &str = "catalog/app_store.html";
pub const TODO_INDEX: &str = "todos/index.html";

const SOURCES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    (APP, include_str!("../templates/catalog/app.html")),
    (APPS, include_str!("../templates/catalog/apps.html")),
    (DETAILS, include_str!("../templates/catalog/details.html")),
    (APP_STORE, include_str!("../templates/catalog/app_store.html")),
    (TODO_INDEX, include_str!("../templates/todos/index.html")),
];

/// The site's template set. `.html` templates are autoescaped.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, SiteError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(SOURCES.iter().copied())?;
        Ok(Self { tera })
    }

    /// Render `name` with a serializable context.
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, SiteError> {
        let ctx = Context::from_serialize(context)?;
        Ok(self.tera.render(name, &ctx)?)
    }

    pub fn render_html<T: Serialize>(&self, name: &str, context: &T) -> Result<Html<String>, SiteError> {
        self.render(name, context).map(Html)
    }
}
