use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use semaphore_types::TransactionResult;
use serde::Serialize;

pub const REVERTED_MESSAGE: &str = "Transaction reverted on-chain";

/// Body shared by every response, success or failure.
#[derive(Clone, Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn error(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// An `ApiResponse` paired with its HTTP status.
#[derive(Debug)]
pub struct Envelope<T> {
    pub status: StatusCode,
    pub body: ApiResponse<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: ApiResponse::success(data),
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: ApiResponse::success(data),
        }
    }

    /// Envelope for a confirmed write. Reverted receipts still succeed at the
    /// HTTP level but always answer 200 and carry an explanatory message.
    pub fn written(success_status: StatusCode, transaction: &TransactionResult, data: T) -> Self {
        if transaction.is_success() {
            Self {
                status: success_status,
                body: ApiResponse::success(data),
            }
        } else {
            Self {
                status: StatusCode::OK,
                body: ApiResponse::success(data).with_message(REVERTED_MESSAGE),
            }
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
