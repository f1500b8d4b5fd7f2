//! Error taxonomy shared by every service in the backend.
//!
//! All internal failures are translated into one of these variants at the
//! handler boundary; full detail stays in the server log, the HTTP response
//! carries only a stable `code` and a user-facing message.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// User-correctable input problem: blank name, bad audience value,
    /// missing required fields, unsupported format.
    #[error("{0}")]
    Validation(String),

    /// The referenced row does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The document row exists but the layout binary behind it is gone
    /// (deleted independently of the draft). Distinct from `NotFound`
    /// because the remedy is re-uploading the layout, not recreating
    /// the record.
    #[error("the layout file backing this document is missing")]
    MissingLayoutFile,

    /// The uploaded bytes cannot be read as a DOCX package.
    #[error("invalid DOCX template: {0}")]
    TemplateFormat(String),

    /// Placeholder substitution failed against the template structure.
    #[error("template rendering failed: {0}")]
    Render(String),

    /// HTML or PDF conversion failed; the DOCX format usually still works.
    #[error("PDF generation failed, try the DOCX format ({0})")]
    Conversion(String),

    /// Storage or filesystem fault. Detail is logged, never returned.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MissingLayoutFile => "MISSING_LAYOUT_FILE",
            ApiError::TemplateFormat(_) => "TEMPLATE_FORMAT",
            ApiError::Render(_) => "RENDER",
            ApiError::Conversion(_) => "CONVERSION",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    /// Wraps a storage/filesystem fault, logging the full detail.
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        log::error!("internal error: {}", err);
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::MissingLayoutFile => StatusCode::NOT_FOUND,
            ApiError::TemplateFormat(_) | ApiError::Render(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conversion(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal detail never leaves the server; it was logged at wrap time.
        let message = match self {
            ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "code": self.code(),
            "message": message,
        }))
    }
}

/// Maps JSON body failures (malformed JSON, unknown `format` or `audience`
/// values rejected during deserialization) onto the same `{code, message}`
/// body every other validation error uses, instead of actix's plain-text
/// default.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::internal(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(err)
    }
}
