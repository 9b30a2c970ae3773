//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while rendering every
//! failure as the same JSON envelope:
//!
//! ```json
//! {"timestamp":"…","status":404,"error":"Not Found",
//!  "message":"User not found with id: 7","errorCode":"NOT_FOUND",
//!  "path":"/api/v1/users/7","traceId":"…"}
//! ```

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::{TRACE_ID_HEADER, current_request_path};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message sent in place of internal error details.
pub const REDACTED_MESSAGE: &str = "An unexpected error occurred";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// When the error was rendered.
    pub timestamp: DateTime<Utc>,
    /// HTTP status code.
    #[schema(example = 404)]
    pub status: u16,
    /// HTTP reason phrase.
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable description.
    #[schema(example = "User not found with id: 7")]
    pub message: String,
    /// Stable machine-readable category.
    #[schema(example = "NOT_FOUND")]
    pub error_code: String,
    /// Request path that failed.
    #[schema(example = "/api/v1/users/7")]
    pub path: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Structured context such as the offending field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_code_label(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::InvalidRequest => "BAD_REQUEST",
        ErrorCode::NotFound => "NOT_FOUND",
        ErrorCode::Conflict => "CONFLICT",
        ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        ErrorCode::InternalError => "INTERNAL_SERVER_ERROR",
    }
}

impl ErrorEnvelope {
    /// Render `error` for the request at `path`, redacting internal details.
    pub fn from_error(error: &Error, path: impl Into<String>) -> Self {
        let status = status_for(error.code());
        let internal = matches!(error.code(), ErrorCode::InternalError);
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            message: if internal {
                REDACTED_MESSAGE.to_owned()
            } else {
                error.message().to_owned()
            },
            error_code: error_code_label(error.code()).to_owned(),
            path: path.into(),
            trace_id: error.trace_id().map(str::to_owned),
            details: if internal {
                None
            } else {
                error.details().cloned()
            },
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let path = current_request_path().unwrap_or_default();
        match self.code() {
            ErrorCode::InternalError => error!(
                trace_id = self.trace_id().unwrap_or("-"),
                path = %path,
                message = self.message(),
                "request failed with internal error"
            ),
            ErrorCode::ServiceUnavailable => warn!(
                trace_id = self.trace_id().unwrap_or("-"),
                path = %path,
                message = self.message(),
                "request failed: dependency unavailable"
            ),
            _ => {}
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorEnvelope::from_error(self, path))
    }
}
