//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::error::CatalogError;

/// Failure of an HTTP handler.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal {
        message: String,
        /// Underlying error, exposed only in development mode.
        detail: Option<String>,
    },
}

impl ApiError {
    /// Map a catalog error, using `message` as the generic 500 text.
    pub fn from_catalog(err: CatalogError, message: &str, development: bool) -> Self {
        match err {
            CatalogError::Validation(msg) => ApiError::BadRequest(msg),
            CatalogError::NotFound(_) => ApiError::NotFound("Song not found".into()),
            other => {
                error!("{}: {}", message, other);
                ApiError::Internal {
                    message: message.to_string(),
                    detail: development.then(|| other.to_string()),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str(), None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str(), None),
            ApiError::Internal { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message.as_str(),
                detail.as_deref(),
            ),
        };

        let body = ErrorBody {
            success: false,
            message,
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping() {
        assert_eq!(
            ApiError::from_catalog(
                CatalogError::Validation("Search query is required".into()),
                "Failed to search songs",
                false
            ),
            ApiError::BadRequest("Search query is required".into())
        );
        assert_eq!(
            ApiError::from_catalog(CatalogError::NotFound("track 1".into()), "x", false),
            ApiError::NotFound("Song not found".into())
        );
        assert_eq!(
            ApiError::from_catalog(CatalogError::Timeout, "Failed to fetch song", false),
            ApiError::Internal {
                message: "Failed to fetch song".into(),
                detail: None
            }
        );
    }

    #[test]
    fn test_detail_only_in_development() {
        let err = ApiError::from_catalog(CatalogError::Timeout, "Failed to fetch song", true);
        assert_eq!(
            err,
            ApiError::Internal {
                message: "Failed to fetch song".into(),
                detail: Some("Request timed out".into())
            }
        );
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
