use actix_web::http::StatusCode;
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use std::fmt;

/// MongoDB server error code for unique index violations.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Validation(String),
    StoreUnavailable(String),
    AlreadyExists(String),
    Store(String),
}

/// Error body passed back to clients inside the `error`/`details` fields.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::Store(_) => "store_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        let message = match self {
            AppError::Validation(msg)
            | AppError::StoreUnavailable(msg)
            | AppError::AlreadyExists(msg)
            | AppError::Store(msg) => msg.clone(),
        };

        ErrorPayload {
            kind: self.kind().to_string(),
            message,
        }
    }

    pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                write_error.code == DUPLICATE_KEY_CODE
            }
            ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            AppError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            AppError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if AppError::is_duplicate_key(&err) {
            return AppError::AlreadyExists(err.to_string());
        }

        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. } => AppError::StoreUnavailable(err.to_string()),
            _ => AppError::Store(err.to_string()),
        }
    }
}
