use super::envelope::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use semaphore_types::{ErrorKind, FieldViolation, GatewayError};
use serde::Serialize;
use tracing::{debug, error, warn};

pub const VALIDATION_MESSAGE: &str = "Validation error";
pub const TRANSPORT_MESSAGE: &str = "Blockchain request failed";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Clone, Debug, Serialize)]
pub struct ErrorDetails {
    pub details: Vec<FieldViolation>,
}

/// HTTP-facing wrapper so handlers can use `?` on `GatewayError`.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ErrorReply {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Vec<FieldViolation>>,
}

/// Maps an error to the status and client-visible message it is reported with.
pub fn classify(err: &GatewayError) -> ErrorReply {
    let (status, message) = match err {
        GatewayError::Validation(violations) => {
            return ErrorReply {
                status: StatusCode::BAD_REQUEST,
                message: VALIDATION_MESSAGE.to_string(),
                details: Some(violations.clone()),
            }
        }
        GatewayError::Domain { status, message } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message.clone(),
        ),
        GatewayError::Reverted(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        GatewayError::Transport(_) => (StatusCode::INTERNAL_SERVER_ERROR, TRANSPORT_MESSAGE.to_string()),
        GatewayError::Timeout(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        GatewayError::Decode(_) | GatewayError::Config(_) | GatewayError::Internal(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
        }
    };

    ErrorReply {
        status,
        message,
        details: None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0.kind() {
            ErrorKind::Validation | ErrorKind::Domain => debug!("Request rejected: {}", self.0),
            ErrorKind::Transport => warn!("Chain request failed: {}", self.0),
            ErrorKind::Unknown => error!("Unhandled error: {}", self.0),
        }

        let reply = classify(&self.0);
        let body = ApiResponse::error(
            reply.message,
            reply.details.map(|details| ErrorDetails { details }),
        );
        (reply.status, Json(body)).into_response()
    }
}
