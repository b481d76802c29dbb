//! Tests for HTTP error mapping.

use super::*;
use crate::domain::TraceId;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("envelope is JSON");
    (status, header, body)
}

#[rstest]
#[case(Error::validation("bad"), StatusCode::BAD_REQUEST, "BAD REQUEST")]
#[case(Error::conflict("taken"), StatusCode::BAD_REQUEST, "BAD REQUEST")]
#[case(Error::malformed_query("where"), StatusCode::BAD_REQUEST, "BAD REQUEST")]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND, "NOT FOUND")]
#[case(Error::store("down"), StatusCode::INTERNAL_SERVER_ERROR, "SERVER ERROR")]
#[actix_web::test]
async fn codes_map_to_status_and_envelope_message(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let (actual, _, body) = render(&error).await;
    assert_eq!(actual, status);
    assert_eq!(body["message"], json!(message));
    assert_eq!(body["data"]["error"], json!(error.message()));
}

#[rstest]
#[actix_web::test]
async fn details_render_as_error_message() {
    let error = Error::conflict("A User with this email already exists")
        .with_details(json!({"email": "a@x.com"}));

    let (_, _, body) = render(&error).await;
    assert_eq!(
        body,
        json!({
            "message": "BAD REQUEST",
            "data": {
                "error": "A User with this email already exists",
                "errorMessage": {"email": "a@x.com"}
            }
        })
    );
}

#[rstest]
#[actix_web::test]
async fn absent_details_are_omitted() {
    let (_, _, body) = render(&Error::not_found("missing")).await;
    assert!(body["data"].get("errorMessage").is_none());
}

#[rstest]
#[actix_web::test]
async fn trace_id_is_echoed_as_header() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = Error::store("down").with_trace_id(trace_id);

    let (_, header, _) = render(&error).await;
    assert_eq!(header.as_deref(), Some(TRACE_ID));
}

#[rstest]
#[actix_web::test]
async fn untraced_errors_omit_the_header() {
    let (_, header, _) = render(&Error::validation("bad")).await;
    assert!(header.is_none());
}
