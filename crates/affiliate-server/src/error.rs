use affiliate_core::error::AffiliateError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Numeric error codes carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ServerError,
    ConstraintViolation,
    InvalidAffiliateWith,
    InvalidRequest,
    InvalidAffiliation,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ServerError => "1000",
            Self::ConstraintViolation => "1001",
            Self::InvalidAffiliateWith => "1002",
            Self::InvalidRequest => "1003",
            Self::InvalidAffiliation => "1004",
        }
    }
}

/// JSON shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub details: Vec<String>,
    pub code: &'static str,
}

/// Unified error type for HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Affiliate(#[from] AffiliateError),

    /// The request could not be read: bad JSON, query string, path or header.
    #[error("{0}")]
    Malformed(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorCode, String, Vec<String>) {
        let err = match self {
            Self::Malformed(detail) => {
                return (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidRequest,
                    "Validation Failed".into(),
                    vec![detail.clone()],
                );
            }
            Self::Affiliate(err) => err,
        };

        match err {
            AffiliateError::InvalidAffiliation { message, details } => (
                StatusCode::NOT_FOUND,
                ErrorCode::InvalidAffiliation,
                message.clone(),
                details.clone(),
            ),
            AffiliateError::Validation { details, .. } => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidRequest,
                "Validation Failed".into(),
                details.clone(),
            ),
            AffiliateError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                ErrorCode::InvalidRequest,
                "Not Found".into(),
                vec![err.to_string()],
            ),
            AffiliateError::InvalidAffiliateWith(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidAffiliateWith,
                "Invalid Organization to affiliate with".into(),
                vec![detail.clone()],
            ),
            AffiliateError::ConstraintViolation(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ConstraintViolation,
                "Constraint Violation".into(),
                vec![detail.clone()],
            ),
            AffiliateError::Database(_) | AffiliateError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ServerError,
                "Server Error".into(),
                vec![err.to_string()],
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            message,
            details,
            code: code.as_str(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}
