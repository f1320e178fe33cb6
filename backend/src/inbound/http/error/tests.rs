//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn decode_response(error: &Error, expected_trace_id: Option<&str>) -> Error {
    let response = ResponseError::error_response(error);
    assert_eq!(response.status(), error.status_code());

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace id header is ascii").to_owned());
    assert_eq!(header.as_deref(), expected_trace_id);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[case::internal(Error::internal("pool exhausted: host db:5432"), "Internal server error")]
#[case::unavailable(
    Error::service_unavailable("user repository unavailable: refused"),
    "Service temporarily unavailable"
)]
#[actix_web::test]
async fn server_errors_are_redacted(
    expected_trace_id: String,
    #[case] error: Error,
    #[case] public_message: &str,
) {
    let error = error
        .with_trace_id(expected_trace_id.as_str())
        .with_details(json!({"secret": "x"}));

    let payload = decode_response(&error, Some(expected_trace_id.as_str())).await;

    assert_eq!(payload.code(), error.code());
    assert_eq!(payload.message(), public_message);
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("name is empty")
        .with_trace_id(expected_trace_id.as_str())
        .with_details(json!({"field": "name", "code": "empty_field"}));

    let payload = decode_response(&error, Some(expected_trace_id.as_str())).await;

    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "name is empty");
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "name", "code": "empty_field"}))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::not_found("user missing");

    let payload = decode_response(&error, None).await;

    assert_eq!(payload.code(), ErrorCode::NotFound);
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
fn actix_errors_become_internal() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream detail");

    let error = Error::from(actix_error);

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
}
