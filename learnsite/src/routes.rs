//! The route table.
//!
//! | Method   | Path           | View                                    |
//! |----------|----------------|-----------------------------------------|
//! | GET      | `/`            | [`catalog::app`]                        |
//! | GET      | `/data/`       | [`catalog::app_data`]                   |
//! | GET      | `/data/:id/`   | [`catalog::details_page`]               |
//! | GET/POST | `/app_store/`  | [`catalog::app_store`] / `app_store_submit` |
//! | GET      | `/todos/`      | [`todos::index`]                        |
//! | GET/POST | `/todos/add/`  | [`todos::add_todo_page`] / `add_todo`   |
//! | GET      | `/media/*`     | files under the configured media root   |
//!
//! Each slashed path also answers GET without its trailing slash with a
//! `301` to the slashed form.

use axum::Router;
use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::views::{catalog, todos};
use crate::{AppState, SiteError};

pub fn router(state: AppState) -> Router {
    let media = ServeDir::new(&state.config.media_root);

    Router::new()
        .merge(catalog_routes())
        .merge(todo_routes())
        .nest_service("/media", media)
        .fallback(not_found)
        .with_state(state)
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::app))
        .route("/data/", get(catalog::app_data))
        .route("/data", get(append_slash))
        .route("/data/:id/", get(catalog::details_page))
        .route("/data/:id", get(append_slash))
        .route(
            "/app_store/",
            get(catalog::app_store).post(catalog::app_store_submit),
        )
        .route("/app_store", get(append_slash))
}

fn todo_routes() -> Router<AppState> {
    Router::new()
        .route(todos::TODO_INDEX_PATH, get(todos::index))
        .route("/todos", get(append_slash))
        .route(
            todos::TODO_ADD_PATH,
            get(todos::add_todo_page).post(todos::add_todo),
        )
        .route("/todos/add", get(append_slash))
}

async fn append_slash(uri: Uri) -> impl IntoResponse {
    let target = match uri.query() {
        Some(query) => format!("{}/?{query}", uri.path()),
        None => format!("{}/", uri.path()),
    };
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)])
}

async fn not_found(uri: Uri) -> SiteError {
    SiteError::NotFound(format!("Page {}", uri.path()))
}
