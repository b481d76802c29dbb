//! `{message, data}` response envelope shared by every endpoint.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Message for successful reads.
pub const OK: &str = "OK";
/// Message for successful creates.
pub const CREATED: &str = "CREATED";
/// Message for successful replacements.
pub const UPDATED: &str = "UPDATED";
/// Message for successful deletes.
pub const DELETED: &str = "DELETED";
/// Message for 400 responses.
pub const BAD_REQUEST: &str = "BAD REQUEST";
/// Message for 404 responses.
pub const NOT_FOUND: &str = "NOT FOUND";
/// Message for 5xx responses.
pub const SERVER_ERROR: &str = "SERVER ERROR";

/// Response body wrapper.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Outcome label such as `OK` or `NOT FOUND`.
    pub message: &'static str,
    /// Payload: a document, a list, a count or an error body.
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Render the envelope as a JSON response with `status`.
    pub fn respond(status: StatusCode, message: &'static str, data: T) -> HttpResponse {
        HttpResponse::build(status).json(Self { message, data })
    }
}

/// `200 OK` with `data`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    Envelope::respond(StatusCode::OK, OK, data)
}

/// `201 CREATED` with the stored document.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    Envelope::respond(StatusCode::CREATED, CREATED, data)
}

/// `200 UPDATED` with the replacement document.
pub fn updated<T: Serialize>(data: T) -> HttpResponse {
    Envelope::respond(StatusCode::OK, UPDATED, data)
}

/// `200 DELETED` with the removed document.
pub fn deleted<T: Serialize>(data: T) -> HttpResponse {
    Envelope::respond(StatusCode::OK, DELETED, data)
}
