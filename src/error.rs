//! Unified error taxonomy for both pipelines.
//!
//! Every failure an invocation can hit is one of four kinds, and every kind
//! maps to a structured JSON body instead of being logged and dropped.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::generators::GeneratorError;
use crate::storage::StorageError;
use crate::ErrorResponse;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Generation(#[from] GeneratorError),
    #[error("{0}")]
    Parse(String),
}

impl DocumentError {
    /// Stable name of the error kind, as reported in the `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Storage(_) => "StorageError",
            Self::Generation(_) => "GenerationError",
            Self::Parse(_) => "ParseError",
        }
    }

    pub fn parse(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Parse(format!("{context}: {err}"))
    }
}

impl ResponseError for DocumentError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) | Self::Generation(_) | Self::Parse(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse::new(
            self.kind(),
            &self.to_string(),
            status.as_u16(),
        ))
    }
}
