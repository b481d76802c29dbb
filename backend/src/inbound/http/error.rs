//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while turning domain
//! failures into enveloped JSON responses with consistent status codes.
//!
//! ```text
//! {"message": "NOT FOUND", "data": {"error": "...", "errorMessage": ...}}
//! ```

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::inbound::http::envelope::{BAD_REQUEST, Envelope, NOT_FOUND, SERVER_ERROR};

/// `data` payload of an error envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody<'a> {
    /// Human-readable summary.
    pub error: &'a str,
    /// Underlying cause, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'a Value>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::Conflict | ErrorCode::MalformedQuery => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for(status: StatusCode) -> &'static str {
    if status == StatusCode::NOT_FOUND {
        NOT_FOUND
    } else if status.is_client_error() {
        BAD_REQUEST
    } else {
        SERVER_ERROR
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let trace_id = self.trace_id().map(tracing::field::display);
        if status.is_server_error() {
            error!(
                trace_id,
                code = self.code().as_str(),
                details = ?self.details(),
                "{}",
                self.message()
            );
        } else {
            info!(trace_id, code = self.code().as_str(), "{}", self.message());
        }

        let body = ErrorBody {
            error: self.message(),
            error_message: self.details(),
        };
        let mut response = Envelope::respond(status, message_for(status), body);
        if let Some(value) = self
            .trace_id()
            .and_then(|id| HeaderValue::from_str(&id.to_string()).ok())
        {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        response
    }
}

#[cfg(test)]
mod tests;
