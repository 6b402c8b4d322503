//! Handler tests for the rating endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::rating::{Rating, RatingDraft, RatingScore, RatingStats};
use crate::domain::skill::{SkillLevel, SkillSnapshot};
use crate::domain::user::UserId;
use crate::domain::{Error, Page};
use crate::domain::ports::UserRatingsResponse;
use crate::inbound::http::test_utils::{
    TestPorts, login_cookie, test_login_route, test_session_middleware,
};

fn fixture_rating(rater: UserId, rated: UserId) -> Rating {
    Rating::new(RatingDraft {
        id: Uuid::new_v4(),
        swap_request_id: Uuid::new_v4(),
        rater,
        rated_user: rated,
        score: RatingScore::new(5).expect("score in range"),
        comment: Some("great teacher".to_owned()),
        skill_rated: SkillSnapshot {
            name: "Painting".to_owned(),
            description: None,
            level: SkillLevel::Expert,
        },
        created_at: Utc
            .with_ymd_and_hms(2026, 3, 20, 18, 30, 0)
            .single()
            .expect("valid fixture timestamp"),
    })
    .expect("fixture rating")
}

fn rating_app(
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
                .service(submit_rating)
                .service(list_my_ratings)
                .service(list_user_ratings)
                .service(get_rating)
                .service(update_rating)
                .service(delete_rating),
        )
}

#[actix_web::test]
async fn submit_returns_created_rating() {
    let rater = UserId::random();
    let rated = UserId::random();
    let swap_id = Uuid::new_v4();

    let mut ports = TestPorts::default();
    let created = fixture_rating(rater, rated);
    ports
        .ratings
        .expect_submit()
        .withf(move |request| {
            request.swap_request_id == swap_id
                && request.rater == rater
                && request.score.value() == 5
        })
        .returning(move |_| Ok(created.clone()));

    let app = actix_test::init_service(rating_app(ports)).await;
    let cookie = login_cookie(&app, &rater).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/ratings")
            .cookie(cookie)
            .set_json(json!({
                "swapRequestId": swap_id.to_string(),
                "rating": 5,
                "comment": "great teacher",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("rating").and_then(Value::as_u64), Some(5));
    assert_eq!(
        body.get("ratedUserId").and_then(Value::as_str),
        Some(rated.to_string().as_str())
    );
}

#[actix_web::test]
async fn submit_rejects_out_of_range_scores_before_the_service() {
    let rater = UserId::random();
    // No expectation on the command port: reaching it would panic the mock.
    let app = actix_test::init_service(rating_app(TestPorts::default())).await;
    let cookie = login_cookie(&app, &rater).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/ratings")
            .cookie(cookie)
            .set_json(json!({
                "swapRequestId": Uuid::new_v4().to_string(),
                "rating": 9,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn duplicate_submission_maps_to_conflict() {
    let rater = UserId::random();

    let mut ports = TestPorts::default();
    ports
        .ratings
        .expect_submit()
        .returning(|_| Err(Error::duplicate_rating("you have already rated this swap")));

    let app = actix_test::init_service(rating_app(ports)).await;
    let cookie = login_cookie(&app, &rater).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/ratings")
            .cookie(cookie)
            .set_json(json!({
                "swapRequestId": Uuid::new_v4().to_string(),
                "rating": 4,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("duplicate_rating")
    );
}

#[actix_web::test]
async fn user_ratings_include_stats_and_pagination() {
    let viewer = UserId::random();
    let rated = UserId::random();

    let mut ports = TestPorts::default();
    let listed = fixture_rating(UserId::random(), rated);
    ports
        .ratings_query
        .expect_list_for_user()
        .withf(move |user, _| *user == rated)
        .returning(move |_, page| {
            Ok(UserRatingsResponse {
                ratings: Page::new(vec![listed.clone()], page, 11),
                stats: RatingStats::from_parts(43, 11),
            })
        });

    let app = actix_test::init_service(rating_app(ports)).await;
    let cookie = login_cookie(&app, &viewer).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/ratings/user/{rated}?page=1&limit=10"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("averageRating").and_then(Value::as_f64),
        Some(4.3)
    );
    assert_eq!(body.get("totalRatings").and_then(Value::as_u64), Some(11));
    let pagination = body.get("pagination").expect("pagination envelope");
    assert_eq!(
        pagination.get("hasNextPage").and_then(Value::as_bool),
        Some(true)
    );
}

#[actix_web::test]
async fn update_dispatches_to_the_command_port() {
    let rater = UserId::random();
    let rating_id = Uuid::new_v4();

    let mut ports = TestPorts::default();
    let revised = fixture_rating(rater, UserId::random());
    ports
        .ratings
        .expect_update()
        .withf(move |request| {
            request.rating_id == rating_id && request.rater == rater && request.score.value() == 2
        })
        .returning(move |_| Ok(revised.clone()));

    let app = actix_test::init_service(rating_app(ports)).await;
    let cookie = login_cookie(&app, &rater).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/ratings/{rating_id}"))
            .cookie(cookie)
            .set_json(json!({ "rating": 2 }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let rater = UserId::random();
    let rating_id = Uuid::new_v4();

    let mut ports = TestPorts::default();
    ports
        .ratings
        .expect_delete()
        .withf(move |id, user| *id == rating_id && *user == rater)
        .returning(|_, _| Ok(()));

    let app = actix_test::init_service(rating_app(ports)).await;
    let cookie = login_cookie(&app, &rater).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/ratings/{rating_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
