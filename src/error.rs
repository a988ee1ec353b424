use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::validation::ValidationError;

pub const PAYMENT_FAILED_MESSAGE: &str = "Payment failed. Please try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Why a pre-order submission failed. `Display` is the message shown to the
/// person filling in the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreorderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to create payment intent")]
    Intent { status: u16 },

    #[error("{0}")]
    Confirmation(String),

    #[error("{0}")]
    Network(String),

    #[error("A pre-order is already being processed")]
    Busy,
}

impl PreorderError {
    /// A declined confirmation, falling back to the generic message when the
    /// API gave none.
    pub fn declined(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.trim().is_empty() => PreorderError::Confirmation(message),
            _ => PreorderError::Confirmation(PAYMENT_FAILED_MESSAGE.to_string()),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            PreorderError::Network(GENERIC_ERROR_MESSAGE.to_string())
        } else {
            PreorderError::Network(message)
        }
    }
}

impl From<GatewayError> for PreorderError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::IntentRejected { status } => PreorderError::Intent { status },
            other => PreorderError::network(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PaymentDeclined(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PaymentDeclined(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PreorderError> for AppError {
    fn from(err: PreorderError) -> Self {
        let message = err.to_string();
        match err {
            PreorderError::Validation(_) => AppError::Validation(message),
            PreorderError::Confirmation(_) => AppError::PaymentDeclined(message),
            PreorderError::Intent { .. } | PreorderError::Network(_) => AppError::Upstream(message),
            PreorderError::Busy => AppError::Conflict(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
