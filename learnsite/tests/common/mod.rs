#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use learnsite::entity::{AppType, NewAppVariety};
use learnsite::{AppState, SiteConfig, SiteDbBuilder};
use rust_decimal::Decimal;
use tower::ServiceExt;

pub struct Site {
    pub state: AppState,
    pub app: Router,
}

/// A fresh site backed by its own in-memory database with both tables created.
pub async fn site() -> Site {
    site_with_config(SiteConfig::in_memory()).await
}

pub async fn site_with_config(config: SiteConfig) -> Site {
    let _ = env_logger::builder().is_test(true).try_init();

    let db = SiteDbBuilder::new(&config.database_url)
        .build()
        .await
        .expect("Failed to open in-memory database");
    learnsite::entity::migrate(&db)
        .await
        .expect("Failed to create tables");

    let state = AppState::new(db, config).expect("Failed to load templates");
    let app = learnsite::routes::router(state.clone());
    Site { state, app }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    Reply {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub async fn get(app: &Router, uri: &str) -> Reply {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    send(app, request).await
}

/// POST an urlencoded body; callers percent-encode values themselves.
pub async fn post_form(app: &Router, uri: &str, body: &str) -> Reply {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");
    send(app, request).await
}

pub fn new_app(name: &str, price: Decimal) -> NewAppVariety {
    NewAppVariety {
        name: name.to_string(),
        image: format!("{}.png", name.to_lowercase()),
        email: format!("{}@example.com", name.to_lowercase()),
        app_type: AppType::Fullstack,
        description: format!("{name} does everything"),
        price,
        date: None,
    }
}
