//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::{AuthError, CartError, DomainError};
use projections::ProjectionError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    /// No session, or the session cannot be used for this request.
    #[error("{0}")]
    Unauthorized(String),
    /// Signed in, but with the wrong role.
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl ApiError {
    pub fn not_authenticated() -> Self {
        ApiError::Unauthorized("You must be logged in".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Projection(err) => internal(err.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn internal(message: String) -> (StatusCode, String) {
    tracing::error!(error = %message, "internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Auth(auth_err) => match auth_err {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
            AuthError::EmailAlreadyRegistered => (StatusCode::CONFLICT, err.to_string()),
            AuthError::RoleNotAllowed(_) => (StatusCode::FORBIDDEN, err.to_string()),
        },
        DomainError::Cart(CartError::ItemNotFound { .. }) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DomainError::Transaction(_) => (StatusCode::CONFLICT, err.to_string()),
        DomainError::Storage(_) => internal(err.to_string()),
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match err {
        CheckoutError::NotAuthenticated => (StatusCode::UNAUTHORIZED, err.to_string()),
        CheckoutError::Domain(inner) => domain_error_to_response(inner),
    }
}
