//! Handler tests for the session endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use super::*;
use crate::domain::rating::RatingStats;
use crate::domain::user::{
    Availability, DisplayName, Location, Role, User, UserDraft, UserId,
};
use crate::domain::Error;
use crate::inbound::http::test_utils::{TestPorts, test_session_middleware};

fn fixture_user(id: UserId, banned: bool) -> User {
    let mut user = User::new(UserDraft {
        id,
        display_name: DisplayName::new("Ada Lovelace").expect("fixture name"),
        location: Location::new("London").expect("fixture location"),
        availability: Availability::Flexible,
        skills_offered: Vec::new(),
        skills_wanted: Vec::new(),
        is_profile_public: true,
        role: Role::User,
        is_banned: false,
        ban_reason: None,
        rating_stats: RatingStats::default(),
        completed_swaps: 0,
    })
    .expect("fixture user");
    if banned {
        user.ban(Some("moderated".to_owned()));
    }
    user
}

fn auth_app(
    ports: TestPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").service(login).service(logout))
}

#[actix_web::test]
async fn login_sets_a_session_cookie() {
    let user_id = UserId::random();

    let mut ports = TestPorts::default();
    ports
        .users_query
        .expect_get_user()
        .withf(move |id| *id == user_id)
        .returning(|id| Ok(fixture_user(id, false)));

    let app = actix_test::init_service(auth_app(ports)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "userId": user_id.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session")
    );
}

#[actix_web::test]
async fn banned_users_cannot_log_in() {
    let user_id = UserId::random();

    let mut ports = TestPorts::default();
    ports
        .users_query
        .expect_get_user()
        .returning(|id| Ok(fixture_user(id, true)));

    let app = actix_test::init_service(auth_app(ports)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "userId": user_id.to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unknown_users_cannot_log_in() {
    let mut ports = TestPorts::default();
    ports
        .users_query
        .expect_get_user()
        .returning(|id| Err(Error::not_found(format!("user {id} not found"))));

    let app = actix_test::init_service(auth_app(ports)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "userId": UserId::random().to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_user_id_is_a_bad_request() {
    let app = actix_test::init_service(auth_app(TestPorts::default())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "userId": "not-a-uuid" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let app = actix_test::init_service(auth_app(TestPorts::default())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
