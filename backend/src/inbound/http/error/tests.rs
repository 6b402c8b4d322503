//! Tests for the HTTP error mapping.

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::Value;

use super::*;

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("nope"), StatusCode::FORBIDDEN)]
#[case(Error::not_participant("not yours"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::invalid_state("wrong status"), StatusCode::CONFLICT)]
#[case(Error::duplicate_rating("again"), StatusCode::CONFLICT)]
#[case(Error::not_completed("not done"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_codes_follow_the_taxonomy(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("secret database details")
        .with_trace_id("abc")
        .with_details(serde_json::json!({ "dsn": "postgres://" }));
    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace id header present")
        .to_str()
        .expect("header is ascii");
    assert_eq!(header, "abc");

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading body succeeds");
    let value: Value = serde_json::from_slice(&bytes).expect("error payload parses");
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("Internal server error")
    );
    assert!(value.get("details").is_none());
}

#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_state("swap request is no longer pending");
    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading body succeeds");
    let value: Value = serde_json::from_slice(&bytes).expect("error payload parses");
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("invalid_state")
    );
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("swap request is no longer pending")
    );
}
