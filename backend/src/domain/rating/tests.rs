//! Tests for ratings and the full-recompute statistics.

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::skill::SkillLevel;

fn score(value: u8) -> RatingScore {
    RatingScore::new(value).expect("score in range")
}

#[fixture]
fn draft() -> RatingDraft {
    RatingDraft {
        id: Uuid::new_v4(),
        swap_request_id: Uuid::new_v4(),
        rater: UserId::random(),
        rated_user: UserId::random(),
        score: score(5),
        comment: Some("great teacher".to_owned()),
        skill_rated: SkillSnapshot {
            name: "Painting".to_owned(),
            description: Some("watercolours".to_owned()),
            level: SkillLevel::Expert,
        },
        created_at: Utc::now(),
    }
}

#[rstest]
#[case(0)]
#[case(6)]
fn score_rejects_out_of_range(#[case] value: u8) {
    let error = RatingScore::new(value).expect_err("score out of range");
    assert_eq!(
        error,
        RatingValidationError::ScoreOutOfRange { min: 1, max: 5 }
    );
}

#[rstest]
#[case(1)]
#[case(5)]
fn score_accepts_bounds(#[case] value: u8) {
    assert_eq!(score(value).value(), value);
}

#[test]
fn stats_of_empty_set_are_zero() {
    let stats = RatingStats::from_scores([]);
    assert_eq!(stats.average_tenths(), 0);
    assert_eq!(stats.total(), 0);
    assert!((stats.average() - 0.0).abs() < f64::EPSILON);
}

#[rstest]
#[case(vec![5], 50, 1)]
#[case(vec![4, 5], 45, 2)]
#[case(vec![3, 4], 35, 2)]
#[case(vec![1, 1, 5], 23, 3)]
#[case(vec![2, 2, 3], 23, 3)]
#[case(vec![1, 2, 2], 17, 3)]
fn stats_round_half_up_to_one_decimal(
    #[case] scores: Vec<u8>,
    #[case] expected_tenths: u16,
    #[case] expected_total: u32,
) {
    let stats = RatingStats::from_scores(scores.into_iter().map(score));
    assert_eq!(stats.average_tenths(), expected_tenths);
    assert_eq!(stats.total(), expected_total);
}

#[test]
fn average_presents_one_decimal() {
    let stats = RatingStats::from_parts(43, 7);
    assert!((stats.average() - 4.3).abs() < f64::EPSILON);
}

#[rstest]
fn rejects_self_rating(mut draft: RatingDraft) {
    draft.rated_user = draft.rater;
    let error = Rating::new(draft).expect_err("self rating rejected");
    assert_eq!(error, RatingValidationError::SelfRating);
}

#[rstest]
fn rejects_overlong_comment(mut draft: RatingDraft) {
    draft.comment = Some("a".repeat(RATING_COMMENT_MAX + 1));
    let error = Rating::new(draft).expect_err("comment too long");
    assert_eq!(
        error,
        RatingValidationError::CommentTooLong {
            max: RATING_COMMENT_MAX
        }
    );
}

#[rstest]
fn strips_description_from_skill_snapshot(draft: RatingDraft) {
    let rating = Rating::new(draft).expect("valid rating");
    assert!(rating.skill_rated().description.is_none());
    assert_eq!(rating.skill_rated().name, "Painting");
}

#[rstest]
fn revise_replaces_score_and_comment(draft: RatingDraft) {
    let mut rating = Rating::new(draft).expect("valid rating");
    rating
        .revise(score(2), None)
        .expect("revision within limits");
    assert_eq!(rating.score().value(), 2);
    assert!(rating.comment().is_none());
}

#[rstest]
fn revise_validates_comment(draft: RatingDraft) {
    let mut rating = Rating::new(draft).expect("valid rating");
    let error = rating
        .revise(score(2), Some("a".repeat(RATING_COMMENT_MAX + 1)))
        .expect_err("comment too long");
    assert!(matches!(error, RatingValidationError::CommentTooLong { .. }));
}
