//! Handler tests for the user directory and profile endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use super::*;
use crate::domain::rating::RatingStats;
use crate::domain::skill::SkillLevel;
use crate::domain::user::{Availability, Role, SkillSide, User, UserDraft, UserId};
use crate::domain::Page;
use crate::inbound::http::test_utils::{
    TestPorts, login_cookie, test_login_route, test_session_middleware,
};

fn fixture_user(id: UserId) -> User {
    User::new(UserDraft {
        id,
        display_name: DisplayName::new("Ada Lovelace").expect("fixture name"),
        location: Location::new("London").expect("fixture location"),
        availability: Availability::Evenings,
        skills_offered: vec![
            Skill::new("Guitar", "Acoustic and electric", SkillLevel::Advanced)
                .expect("fixture skill"),
        ],
        skills_wanted: Vec::new(),
        is_profile_public: true,
        role: Role::User,
        is_banned: false,
        ban_reason: None,
        rating_stats: RatingStats::from_parts(45, 2),
        completed_swaps: 3,
    })
    .expect("fixture user")
}

fn user_app(
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
        .service(test_login_route())
        .service(
            web::scope("/api/v1")
                .service(update_profile)
                .service(add_skill)
                .service(remove_skill)
                .service(list_users)
                .service(get_user),
        )
}

#[actix_web::test]
async fn list_returns_camel_case_profiles() {
    let viewer = UserId::random();

    let mut ports = TestPorts::default();
    let listed = fixture_user(UserId::random());
    ports
        .users_query
        .expect_list()
        .withf(|search, _| search.skill.as_deref() == Some("guitar"))
        .returning(move |_, page| Ok(Page::new(vec![listed.clone()], page, 1)));

    let app = actix_test::init_service(user_app(ports)).await;
    let cookie = login_cookie(&app, &viewer).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users?skill=guitar")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    let users = body.get("users").and_then(Value::as_array).expect("users");
    let first = users.first().expect("one user");
    assert_eq!(
        first.get("displayName").and_then(Value::as_str),
        Some("Ada Lovelace")
    );
    assert_eq!(
        first.get("averageRating").and_then(Value::as_f64),
        Some(4.5)
    );
    assert!(first.get("display_name").is_none());
}

#[actix_web::test]
async fn get_passes_the_viewer_for_visibility() {
    let viewer = UserId::random();
    let target = UserId::random();

    let mut ports = TestPorts::default();
    ports
        .users_query
        .expect_get_profile()
        .withf(move |user, seen_viewer| *user == target && *seen_viewer == Some(viewer))
        .returning(move |user, _| Ok(fixture_user(user)));

    let app = actix_test::init_service(user_app(ports)).await;
    let cookie = login_cookie(&app, &viewer).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{target}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn update_profile_validates_availability() {
    let acting_user = UserId::random();
    let app = actix_test::init_service(user_app(TestPorts::default())).await;
    let cookie = login_cookie(&app, &acting_user).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/profile")
            .cookie(cookie)
            .set_json(json!({ "availability": "whenever" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_profile_forwards_partial_updates() {
    let acting_user = UserId::random();

    let mut ports = TestPorts::default();
    ports
        .profile
        .expect_update_profile()
        .withf(move |request| {
            request.acting_user == acting_user
                && request.update.location.is_some()
                && request.update.display_name.is_none()
        })
        .returning(move |request| Ok(fixture_user(request.acting_user)));

    let app = actix_test::init_service(user_app(ports)).await;
    let cookie = login_cookie(&app, &acting_user).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/profile")
            .cookie(cookie)
            .set_json(json!({ "location": "Paris" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn add_skill_parses_side_and_level() {
    let acting_user = UserId::random();

    let mut ports = TestPorts::default();
    ports
        .profile
        .expect_add_skill()
        .withf(move |request| {
            request.side == SkillSide::Wanted && request.skill.name() == "Painting"
        })
        .returning(move |request| Ok(fixture_user(request.acting_user)));

    let app = actix_test::init_service(user_app(ports)).await;
    let cookie = login_cookie(&app, &acting_user).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/skills/wanted")
            .cookie(cookie)
            .set_json(json!({
                "name": "Painting",
                "description": "Watercolours",
                "level": "beginner",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn add_skill_rejects_unknown_side() {
    let acting_user = UserId::random();
    let app = actix_test::init_service(user_app(TestPorts::default())).await;
    let cookie = login_cookie(&app, &acting_user).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/skills/sideways")
            .cookie(cookie)
            .set_json(json!({
                "name": "Painting",
                "description": "Watercolours",
                "level": "beginner",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn remove_skill_uses_the_path_name() {
    let acting_user = UserId::random();

    let mut ports = TestPorts::default();
    ports
        .profile
        .expect_remove_skill()
        .withf(move |request| request.side == SkillSide::Offered && request.name == "Guitar")
        .returning(move |request| Ok(fixture_user(request.acting_user)));

    let app = actix_test::init_service(user_app(ports)).await;
    let cookie = login_cookie(&app, &acting_user).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/users/skills/offered/Guitar")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
