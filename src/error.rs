use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::rendering::DomError;
use crate::services::TemplateError;

/// Why a portfolio render run did not complete.
///
/// The first failure aborts the run; the page keeps its placeholder
/// content and the completion signal is not fired.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("Failed to fetch profile: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Profile request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to read {path}: {source}")]
    Asset {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid profile document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Card template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Anchor '{name}' not found (selector '{selector}', index {index})")]
    AnchorNotFound {
        name: String,
        selector: String,
        index: isize,
    },

    #[error("Anchor '{name}' has an invalid selector '{selector}': {reason}")]
    InvalidSelector {
        name: String,
        selector: String,
        reason: String,
    },

    #[error("Anchor '{0}' is not configured")]
    UnknownAnchor(String),

    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    #[error("Malformed template: {0}")]
    Html(String),
}

/// Error returned by HTTP handlers that cannot produce any page
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Load failure: {0}")]
    Load(#[from] LoadFailure),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
