//! # LearnSite
//!
//! A small web site with two unrelated feature sets served from one axum
//! router: an app catalog ([`entity::app_variety`]) and a todo list
//! ([`entity::todo`]).
//!
//! Entities are plain SeaORM models. Annotating a model with
//! `#[derive(SiteEntity)]` registers it for table creation, and
//! `#[derive(ModelForm)]` derives the form binding used to validate
//! submitted fields.
//!
//! ## Quick start
//!
//! ```ignore
//! use learnsite::{AppState, SiteConfig, SiteDbBuilder};
//!
//! let config = SiteConfig::default();
//! let db = SiteDbBuilder::new(&config.database_url).build().await?;
//!
//! // Create every table declared in this crate
//! db.get_schema_registry("learnsite").sync().await?;
//!
//! let app = learnsite::routes::router(AppState::new(db, config.clone())?);
//! let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Key types
//!
//! - [`SiteDb`]: connection wrapper that owns the schema registry
//! - [`SiteDbBuilder`]: configures and opens the connection
//! - [`SchemaBuilder`]: fluent API for creating entity tables
//! - [`AppState`]: shared state handed to every view

// Lets `#[derive(SiteEntity)]` / `#[derive(ModelForm)]` expand to `::learnsite::` paths in this crate too.
extern crate self as learnsite;

pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod forms;
pub mod loader;
pub mod registry;
pub mod routes;
pub mod templates;
pub mod views;

use std::sync::Arc;

pub use config::SiteConfig;
pub use connection::{SchemaBuilder, SiteDb, SiteDbBuilder};
pub use error::SiteError;
pub use registry::{SiteEntityInfo, TableMeta, TableRegistry};
pub use templates::Templates;

pub use learnsite_derive::{ModelForm, SiteEntity};

// Re-exports for use by the derive macros
pub use inventory;
pub use sea_orm;

/// State shared by every view handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SiteDb>,
    pub templates: Arc<Templates>,
    pub config: Arc<SiteConfig>,
}

impl AppState {
    /// Bundle an open connection with the embedded templates.
    pub fn new(db: SiteDb, config: SiteConfig) -> Result<Self, SiteError> {
        Ok(Self {
            db: Arc::new(db),
            templates: Arc::new(Templates::new()?),
            config: Arc::new(config),
        })
    }
}
