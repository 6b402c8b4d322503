//! Unit tests for the rating services against mocked ports.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    MockAuditLog, MockRatingRepository, MockSwapRepository, MockUserRepository,
};
use crate::domain::rating::{RatingScore, RatingStats};
use crate::domain::skill::SkillLevel;
use crate::domain::swap::SwapDraft;

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 20, 18, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn score(value: u8) -> RatingScore {
    RatingScore::new(value).expect("score in range")
}

fn fixture_user(id: UserId) -> crate::domain::user::User {
    use crate::domain::user::{Availability, DisplayName, Location, Role, User, UserDraft};

    User::new(UserDraft {
        id,
        display_name: DisplayName::new("Fixture User").expect("fixture name"),
        location: Location::new("Fixture Town").expect("fixture location"),
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
    .expect("fixture user")
}

fn snapshot(name: &str) -> SkillSnapshot {
    SkillSnapshot {
        name: name.to_owned(),
        description: Some("a description".to_owned()),
        level: SkillLevel::Advanced,
    }
}

fn swap_with_status(
    id: Uuid,
    requester: UserId,
    recipient: UserId,
    status: SwapStatus,
) -> SwapRequest {
    SwapRequest::new(SwapDraft {
        id,
        requester,
        recipient,
        requested_skill: snapshot("Painting"),
        offered_skill: snapshot("Guitar"),
        status,
        message: None,
        scheduled_date: None,
        completed_date: (status == SwapStatus::Completed).then(fixture_timestamp),
        is_rated: false,
        created_at: fixture_timestamp(),
    })
    .expect("fixture swap")
}

fn stored_rating(rating_id: Uuid, swap_id: Uuid, rater: UserId, rated: UserId) -> Rating {
    Rating::new(RatingDraft {
        id: rating_id,
        swap_request_id: swap_id,
        rater,
        rated_user: rated,
        score: score(4),
        comment: Some("solid".to_owned()),
        skill_rated: snapshot("Painting"),
        created_at: fixture_timestamp(),
    })
    .expect("fixture rating")
}

fn quiet_audit() -> MockAuditLog {
    let mut audit = MockAuditLog::new();
    audit.expect_record().returning(|_| Ok(()));
    audit
}

type CommandService = RatingCommandService<
    MockRatingRepository,
    MockSwapRepository,
    MockUserRepository,
    MockAuditLog,
>;

fn command_service(
    ratings: MockRatingRepository,
    swaps: MockSwapRepository,
    users: MockUserRepository,
    audit: MockAuditLog,
) -> CommandService {
    RatingCommandService::new(
        Arc::new(ratings),
        Arc::new(swaps),
        Arc::new(users),
        Arc::new(audit),
        fixture_clock(),
    )
}

mod submit {
    use super::*;

    fn submit_request(swap_id: Uuid, rater: UserId) -> SubmitRatingRequest {
        SubmitRatingRequest {
            swap_request_id: swap_id,
            rater,
            score: score(5),
            comment: Some("great teacher".to_owned()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn persists_and_recomputes_the_rated_user() {
        let swap_id = Uuid::new_v4();
        let requester = UserId::random();
        let recipient = UserId::random();

        let mut swaps = MockSwapRepository::new();
        let completed = swap_with_status(swap_id, requester, recipient, SwapStatus::Completed);
        swaps
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));
        swaps
            .expect_mark_rated()
            .withf(move |id| *id == swap_id)
            .times(1)
            .returning(|_| Ok(()));

        let mut ratings = MockRatingRepository::new();
        ratings
            .expect_insert()
            .withf(move |rating| {
                // Requester rates the recipient on the skill they received.
                *rating.rated_user() == recipient
                    && rating.skill_rated().name == "Painting"
                    && rating.score().value() == 5
            })
            .times(1)
            .returning(|_| Ok(()));
        ratings
            .expect_stats_for()
            .withf(move |user| *user == recipient)
            .returning(|_| Ok(RatingStats::from_parts(50, 1)));

        let mut users = MockUserRepository::new();
        users
            .expect_set_rating_stats()
            .withf(move |user, stats| {
                *user == recipient && stats.average_tenths() == 50 && stats.total() == 1
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = command_service(ratings, swaps, users, quiet_audit());
        let rating = service
            .submit(submit_request(swap_id, requester))
            .await
            .expect("submit succeeds");
        assert_eq!(rating.created_at(), fixture_timestamp());
        assert!(rating.skill_rated().description.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn recipient_rates_the_offered_skill() {
        let swap_id = Uuid::new_v4();
        let requester = UserId::random();
        let recipient = UserId::random();

        let mut swaps = MockSwapRepository::new();
        let completed = swap_with_status(swap_id, requester, recipient, SwapStatus::Completed);
        swaps
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));
        swaps.expect_mark_rated().returning(|_| Ok(()));

        let mut ratings = MockRatingRepository::new();
        ratings
            .expect_insert()
            .withf(move |rating| {
                *rating.rated_user() == requester && rating.skill_rated().name == "Guitar"
            })
            .returning(|_| Ok(()));
        ratings
            .expect_stats_for()
            .returning(|_| Ok(RatingStats::from_parts(50, 1)));

        let mut users = MockUserRepository::new();
        users.expect_set_rating_stats().returning(|_, _| Ok(()));

        let service = command_service(ratings, swaps, users, quiet_audit());
        service
            .submit(submit_request(swap_id, recipient))
            .await
            .expect("submit succeeds");
    }

    #[rstest]
    #[case(SwapStatus::Pending)]
    #[case(SwapStatus::Accepted)]
    #[case(SwapStatus::Rejected)]
    #[case(SwapStatus::Cancelled)]
    #[tokio::test]
    async fn rejects_swaps_that_are_not_completed(#[case] status: SwapStatus) {
        let swap_id = Uuid::new_v4();
        let requester = UserId::random();
        let recipient = UserId::random();

        let mut swaps = MockSwapRepository::new();
        let stored = swap_with_status(swap_id, requester, recipient, status);
        swaps
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = command_service(
            MockRatingRepository::new(),
            swaps,
            MockUserRepository::new(),
            MockAuditLog::new(),
        );
        let error = service
            .submit(submit_request(swap_id, requester))
            .await
            .expect_err("incomplete swap rejected");
        assert_eq!(error.code(), ErrorCode::NotCompleted);
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_non_participants() {
        let swap_id = Uuid::new_v4();
        let mut swaps = MockSwapRepository::new();
        let completed = swap_with_status(
            swap_id,
            UserId::random(),
            UserId::random(),
            SwapStatus::Completed,
        );
        swaps
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));

        let service = command_service(
            MockRatingRepository::new(),
            swaps,
            MockUserRepository::new(),
            MockAuditLog::new(),
        );
        let error = service
            .submit(submit_request(swap_id, UserId::random()))
            .await
            .expect_err("stranger rejected");
        assert_eq!(error.code(), ErrorCode::NotParticipant);
    }

    #[rstest]
    #[tokio::test]
    async fn maps_unique_constraint_race_to_duplicate_rating() {
        let swap_id = Uuid::new_v4();
        let requester = UserId::random();
        let recipient = UserId::random();

        let mut swaps = MockSwapRepository::new();
        let completed = swap_with_status(swap_id, requester, recipient, SwapStatus::Completed);
        swaps
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));

        let mut ratings = MockRatingRepository::new();
        ratings.expect_insert().returning(|_| {
            Err(RatingRepositoryError::duplicate(
                "concurrent insert detected",
            ))
        });

        let service = command_service(
            ratings,
            swaps,
            MockUserRepository::new(),
            MockAuditLog::new(),
        );
        let error = service
            .submit(submit_request(swap_id, requester))
            .await
            .expect_err("duplicate rejected");
        assert_eq!(error.code(), ErrorCode::DuplicateRating);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_swap_is_not_found() {
        let mut swaps = MockSwapRepository::new();
        swaps.expect_find_by_id().returning(|_| Ok(None));

        let service = command_service(
            MockRatingRepository::new(),
            swaps,
            MockUserRepository::new(),
            MockAuditLog::new(),
        );
        let error = service
            .submit(submit_request(Uuid::new_v4(), UserId::random()))
            .await
            .expect_err("missing swap");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}

mod revise_and_delete {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn update_is_rater_scoped_and_recomputes() {
        let rating_id = Uuid::new_v4();
        let rater = UserId::random();
        let rated = UserId::random();

        let mut ratings = MockRatingRepository::new();
        let stored = stored_rating(rating_id, Uuid::new_v4(), rater, rated);
        ratings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        ratings
            .expect_update()
            .withf(|rating| rating.score().value() == 2 && rating.comment().is_none())
            .times(1)
            .returning(|_| Ok(()));
        ratings
            .expect_stats_for()
            .returning(|_| Ok(RatingStats::from_parts(20, 1)));

        let mut users = MockUserRepository::new();
        users
            .expect_set_rating_stats()
            .withf(move |user, _| *user == rated)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = command_service(
            ratings,
            MockSwapRepository::new(),
            users,
            MockAuditLog::new(),
        );
        let updated = service
            .update(UpdateRatingRequest {
                rating_id,
                rater,
                score: score(2),
                comment: None,
            })
            .await
            .expect("update succeeds");
        assert_eq!(updated.score().value(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn update_by_other_user_is_forbidden() {
        let rating_id = Uuid::new_v4();
        let mut ratings = MockRatingRepository::new();
        let stored = stored_rating(rating_id, Uuid::new_v4(), UserId::random(), UserId::random());
        ratings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = command_service(
            ratings,
            MockSwapRepository::new(),
            MockUserRepository::new(),
            MockAuditLog::new(),
        );
        let error = service
            .update(UpdateRatingRequest {
                rating_id,
                rater: UserId::random(),
                score: score(1),
                comment: None,
            })
            .await
            .expect_err("other user rejected");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_recomputes_the_rated_user() {
        let rating_id = Uuid::new_v4();
        let rater = UserId::random();
        let rated = UserId::random();

        let mut ratings = MockRatingRepository::new();
        let stored = stored_rating(rating_id, Uuid::new_v4(), rater, rated);
        ratings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        ratings
            .expect_delete()
            .withf(move |id| *id == rating_id)
            .times(1)
            .returning(|_| Ok(()));
        ratings
            .expect_stats_for()
            .returning(|_| Ok(RatingStats::default()));

        let mut users = MockUserRepository::new();
        users
            .expect_set_rating_stats()
            .withf(move |user, stats| *user == rated && stats.total() == 0)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = command_service(
            ratings,
            MockSwapRepository::new(),
            users,
            MockAuditLog::new(),
        );
        service
            .delete(rating_id, rater)
            .await
            .expect("delete succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_by_other_user_is_forbidden() {
        let rating_id = Uuid::new_v4();
        let mut ratings = MockRatingRepository::new();
        let stored = stored_rating(rating_id, Uuid::new_v4(), UserId::random(), UserId::random());
        ratings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = command_service(
            ratings,
            MockSwapRepository::new(),
            MockUserRepository::new(),
            MockAuditLog::new(),
        );
        let error = service
            .delete(rating_id, UserId::random())
            .await
            .expect_err("other user rejected");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }
}

mod queries {
    use super::*;

    type QueryService =
        RatingQueryService<MockRatingRepository, MockSwapRepository, MockUserRepository>;

    fn query_service(
        ratings: MockRatingRepository,
        swaps: MockSwapRepository,
        users: MockUserRepository,
    ) -> QueryService {
        RatingQueryService::new(Arc::new(ratings), Arc::new(swaps), Arc::new(users))
    }

    #[rstest]
    #[tokio::test]
    async fn get_is_visible_to_rater_and_rated_only() {
        let rating_id = Uuid::new_v4();
        let rater = UserId::random();
        let rated = UserId::random();

        let mut ratings = MockRatingRepository::new();
        let stored = stored_rating(rating_id, Uuid::new_v4(), rater, rated);
        ratings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let service = query_service(ratings, MockSwapRepository::new(), MockUserRepository::new());

        service.get(rating_id, rater).await.expect("rater reads");
        service.get(rating_id, rated).await.expect("rated reads");
        let error = service
            .get(rating_id, UserId::random())
            .await
            .expect_err("stranger denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(SwapStatus::Completed, false, true)]
    #[case(SwapStatus::Completed, true, false)]
    #[case(SwapStatus::Accepted, false, false)]
    #[tokio::test]
    async fn can_rate_requires_completed_and_unrated(
        #[case] status: SwapStatus,
        #[case] already_rated: bool,
        #[case] expected: bool,
    ) {
        let swap_id = Uuid::new_v4();
        let rater = UserId::random();

        let mut swaps = MockSwapRepository::new();
        let stored = swap_with_status(swap_id, rater, UserId::random(), status);
        swaps
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut ratings = MockRatingRepository::new();
        ratings
            .expect_exists_for()
            .returning(move |_, _| Ok(already_rated));

        let service = query_service(ratings, swaps, MockUserRepository::new());
        let can = service
            .can_rate(swap_id, rater)
            .await
            .expect("can_rate succeeds");
        assert_eq!(can, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn can_rate_is_false_for_missing_swaps() {
        let mut swaps = MockSwapRepository::new();
        swaps.expect_find_by_id().returning(|_| Ok(None));
        let service = query_service(
            MockRatingRepository::new(),
            swaps,
            MockUserRepository::new(),
        );
        let can = service
            .can_rate(Uuid::new_v4(), UserId::random())
            .await
            .expect("can_rate succeeds");
        assert!(!can);
    }

    #[rstest]
    #[tokio::test]
    async fn list_for_user_returns_page_and_stats() {
        let rated = UserId::random();
        let rater = UserId::random();

        let mut users = MockUserRepository::new();
        let rated_user = fixture_user(rated);
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(rated_user.clone())));

        let mut ratings = MockRatingRepository::new();
        let listed = stored_rating(Uuid::new_v4(), Uuid::new_v4(), rater, rated);
        ratings.expect_list_for_rated().returning(move |_, page| {
            Ok(Page::new(vec![listed.clone()], page, 1))
        });
        ratings
            .expect_stats_for()
            .returning(|_| Ok(RatingStats::from_parts(40, 1)));

        let service = query_service(ratings, MockSwapRepository::new(), users);
        let response = service
            .list_for_user(rated, PageRequest::default())
            .await
            .expect("list succeeds");
        assert_eq!(response.ratings.items.len(), 1);
        assert_eq!(response.stats.total(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn list_for_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let service = query_service(
            MockRatingRepository::new(),
            MockSwapRepository::new(),
            users,
        );
        let error = service
            .list_for_user(UserId::random(), PageRequest::default())
            .await
            .expect_err("missing user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
