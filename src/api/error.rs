use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::resource::{ResourceError, ValidationError};
use crate::storage::InvalidId;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error("payload exceeds limit of {0} bytes")]
    PayloadTooLarge(usize),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    MalformedId(#[from] InvalidId),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::MalformedId(_) => "MALFORMED_ID",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client mistakes, as opposed to server-side failures
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
            field: match &self {
                ApiError::Validation(err) => Some(err.field()),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ResourceError> for ApiError {
    fn from(value: ResourceError) -> Self {
        match value {
            ResourceError::Validation(err) => ApiError::Validation(err),
            ResourceError::MalformedId(err) => ApiError::MalformedId(err),
            err @ ResourceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ResourceError::Storage(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DocumentId, StoreError};

    #[test]
    fn test_resource_errors_map_to_status() {
        let validation: ApiError = ResourceError::from(ValidationError::MissingField("name")).into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.code(), "VALIDATION_FAILED");

        let malformed: ApiError = ResourceError::from(InvalidId("xyz".to_string())).into();
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(malformed.code(), "MALFORMED_ID");
        assert!(matches!(&malformed, ApiError::MalformedId(InvalidId(raw)) if raw == "xyz"));

        let id: DocumentId = "01890a5d-ac96-774b-bcce-b302099a8057".parse().unwrap();
        let missing: ApiError = ResourceError::NotFound {
            resource: "fruits".to_string(),
            id,
        }
        .into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert!(missing.to_string().contains("01890a5d-ac96-774b-bcce-b302099a8057"));

        let storage: ApiError = ResourceError::from(StoreError::CorruptKey("fruits".to_string())).into();
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!storage.is_client_error());
    }

    #[tokio::test]
    async fn test_validation_response_names_field() {
        let response = ApiError::Validation(ValidationError::MissingField("color")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["field"], "color");
    }
}
