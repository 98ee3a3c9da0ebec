use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        source: validator::ValidationErrors,
    },
}

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::InvalidRecord { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            SiteError::NotFound(what) => {
                log::debug!("Not found: {what}");
                (status, Html(not_found_page(&what))).into_response()
            }
            invalid @ SiteError::InvalidRecord { .. } => {
                log::warn!("Rejected: {invalid}");
                (status, "Bad Request").into_response()
            }
            other => {
                log::error!("Request failed: {other}");
                (status, "Internal Server Error").into_response()
            }
        }
    }
}

/// Built inline; the error path has no access to the template set.
fn not_found_page(what: &str) -> String {
    let escaped = tera::escape_html(what);
    format!(
        "<!DOCTYPE html><html><head><title>Not Found</title></head>\
         <body><h1>Not Found</h1><p>{escaped} does not exist.</p></body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = SiteError::NotFound("AppVariety 7".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let response = SiteError::Database(DbErr::Custom("gone".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_record_maps_to_400() {
        let err = SiteError::InvalidRecord {
            index: 3,
            source: validator::ValidationErrors::new(),
        };
        assert!(err.to_string().starts_with("Record 3 is invalid"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_page_escapes() {
        let page = not_found_page("<b>7</b>");
        assert!(page.contains("&lt;b&gt;7"));
        assert!(!page.contains("<b>"));
    }
}
