use std::io;
use std::string::FromUtf8Error;

use actix_web::{HttpResponse, ResponseError};
use http::StatusCode;
use thiserror::Error;

use crate::models::ErrorBody;

/// Failures reported by the persistence endpoint.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid data")]
    InvalidData,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to write file")]
    WriteFailed(#[source] io::Error),

    #[error("Store file not found")]
    StoreMissing(#[source] io::Error),

    #[error("Failed to read file")]
    ReadFailed(#[source] io::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidData => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::WriteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreMissing(_) => StatusCode::NOT_FOUND,
            AppError::ReadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

/// Failures seen by the client while loading or saving the collection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Database file is empty")]
    Empty,

    #[error("Malformed store file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Store file is not valid UTF-8")]
    Encoding(#[from] FromUtf8Error),
}

/// A UI action that could not be turned into an event.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Unknown action {0:?}")]
    UnknownAction(String),

    #[error("Bad payload for {action}: {source}")]
    Payload {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}
