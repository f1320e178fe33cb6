//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_absent_fields(expected_trace_id: String) {
    let error = Error::invalid_request("name is empty").with_trace_id(expected_trace_id);
    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "name is empty",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[tokio::test]
async fn deserialising_keeps_payload_trace_id_over_ambient_scope() {
    let ambient: TraceId = "11111111-1111-1111-1111-111111111111"
        .parse()
        .expect("valid UUID");
    let payload = json!({
        "code": "not_found",
        "message": "user not found",
        "details": {"id": "abc"},
    });

    let decoded: Error = TraceId::scope(ambient, async move {
        serde_json::from_value(payload).expect("payload deserialises")
    })
    .await;

    assert_eq!(decoded.code(), ErrorCode::NotFound);
    assert!(decoded.trace_id().is_none());
    assert_eq!(decoded.details(), Some(&json!({"id": "abc"})));
}

#[rstest]
fn deserialising_rejects_empty_message() {
    let payload = json!({"code": "internal_error", "message": " "});
    let result: Result<Error, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}
