use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single rejected request field, addressed by its dotted path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Validation error: {} invalid field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("{message}")]
    Domain { status: u16, message: String },

    #[error("Contract call reverted: {0}")]
    Reverted(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Coarse failure classes used to pick an HTTP status and log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Domain,
    Transport,
    Unknown,
}

impl GatewayError {
    pub fn domain(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Domain {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::Validation(vec![FieldViolation::new(field, message)])
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::Domain { .. } | GatewayError::Reverted(_) => ErrorKind::Domain,
            GatewayError::Transport(_) | GatewayError::Timeout(_) => ErrorKind::Transport,
            GatewayError::Decode(_) | GatewayError::Config(_) | GatewayError::Internal(_) => {
                ErrorKind::Unknown
            }
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            GatewayError::Validation(violations) => violations,
            _ => &[],
        }
    }
}
