//! JSON error responses

use crate::core::errors::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Internal { message: String, details: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>, details: impl ToString) -> Self {
        ApiError::Internal {
            message: message.into(),
            details: details.to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_client_error() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::internal("Internal server error", e)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal { message, details } => {
                error!("{message}: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message, "details": details })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let response = ApiError::from(ServiceError::SlotUnavailable).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(ServiceError::validation("Missing required fields")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mailer_failure =
            ServiceError::Mailer(crate::infrastructure::mailer::MailerError::NotConfigured);
        let response = ApiError::from(mailer_failure).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
