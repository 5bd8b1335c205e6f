//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn booking failures into consistent JSON responses and status codes.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use serde_json::Value;

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode};

/// Details key carrying the throttle back-off for rate-limited errors.
pub(crate) const RETRY_AFTER_DETAIL: &str = "retryAfterSeconds";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InactiveResource => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::InvalidInterval => StatusCode::BAD_REQUEST,
        ErrorCode::Conflict | ErrorCode::InvalidTransition => StatusCode::CONFLICT,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

fn retry_after_seconds(error: &Error) -> Option<u64> {
    if error.code() != ErrorCode::RateLimited {
        return None;
    }
    error
        .details()
        .and_then(|details| details.get(RETRY_AFTER_DETAIL))
        .and_then(Value::as_u64)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(seconds) = retry_after_seconds(self) {
            builder.insert_header((header::RETRY_AFTER, seconds.to_string()));
        }

        builder.json(redact_if_internal(self))
    }
}
