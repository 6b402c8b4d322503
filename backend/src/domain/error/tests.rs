//! Tests for the domain error payload.

use rstest::rstest;
use serde_json::{Value, json};

use super::*;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::invalid_state("wrong status"), ErrorCode::InvalidState)]
#[case(Error::duplicate_rating("already rated"), ErrorCode::DuplicateRating)]
#[case(Error::not_completed("not done"), ErrorCode::NotCompleted)]
#[case(Error::not_participant("not yours"), ErrorCode::NotParticipant)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[test]
fn serialises_code_as_snake_case() {
    let err = Error::duplicate_rating("already rated");
    let value = serde_json::to_value(&err).expect("error serialises");
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("duplicate_rating")
    );
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("already rated")
    );
}

#[test]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("error serialises");
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[test]
fn with_details_round_trips() {
    let err = Error::invalid_request("bad").with_details(json!({ "field": "recipientId" }));
    let value = serde_json::to_value(&err).expect("error serialises");
    assert_eq!(
        value
            .get("details")
            .and_then(|details| details.get("field"))
            .and_then(Value::as_str),
        Some("recipientId")
    );
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let expected = trace_id.to_string();
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(expected.as_str()));
}

#[test]
fn new_leaves_trace_id_empty_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[test]
fn with_trace_id_overrides() {
    let err = Error::forbidden("nope").with_trace_id("abc");
    assert_eq!(err.trace_id(), Some("abc"));
}
