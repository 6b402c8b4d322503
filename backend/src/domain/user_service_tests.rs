//! Unit tests for the user directory, profile, and moderation services.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockAuditLog, MockUserRepository};
use crate::domain::rating::RatingStats;
use crate::domain::skill::{Skill, SkillLevel};
use crate::domain::user::{Availability, DisplayName, Location, ProfileUpdate, UserDraft};

fn fixture_user(id: UserId, role: Role, public: bool) -> User {
    User::new(UserDraft {
        id,
        display_name: DisplayName::new("Fixture User").expect("fixture name"),
        location: Location::new("Fixture Town").expect("fixture location"),
        availability: Availability::Evenings,
        skills_offered: vec![
            Skill::new("Guitar", "a description", SkillLevel::Advanced).expect("fixture skill"),
        ],
        skills_wanted: Vec::new(),
        is_profile_public: public,
        role,
        is_banned: false,
        ban_reason: None,
        rating_stats: RatingStats::default(),
        completed_swaps: 0,
    })
    .expect("fixture user")
}

fn quiet_audit() -> MockAuditLog {
    let mut audit = MockAuditLog::new();
    audit.expect_record().returning(|_| Ok(()));
    audit
}

mod directory {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn private_profiles_are_owner_only() {
        let owner = UserId::random();
        let mut users = MockUserRepository::new();
        let stored = fixture_user(owner, Role::User, false);
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let service = UsersQueryService::new(Arc::new(users));

        service
            .get_profile(owner, Some(owner))
            .await
            .expect("owner reads own private profile");
        let error = service
            .get_profile(owner, Some(UserId::random()))
            .await
            .expect_err("stranger denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        let error = service
            .get_profile(owner, None)
            .await
            .expect_err("anonymous denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let service = UsersQueryService::new(Arc::new(users));

        let error = service
            .get_user(UserId::random())
            .await
            .expect_err("missing user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_passes_search_through() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_public()
            .withf(|search, _| search.skill.as_deref() == Some("guitar"))
            .returning(|_, page| Ok(Page::empty(page)));
        let service = UsersQueryService::new(Arc::new(users));

        let page = service
            .list(
                UserSearch {
                    skill: Some("guitar".to_owned()),
                },
                PageRequest::default(),
            )
            .await
            .expect("list succeeds");
        assert!(page.items.is_empty());
    }
}

mod profile {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn update_profile_persists_changes() {
        let acting_user = UserId::random();
        let mut users = MockUserRepository::new();
        let stored = fixture_user(acting_user, Role::User, true);
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        users
            .expect_update()
            .withf(|user| user.location().as_ref() == "Paris")
            .times(1)
            .returning(|_| Ok(()));

        let service = ProfileCommandService::new(Arc::new(users), Arc::new(quiet_audit()));
        let updated = service
            .update_profile(UpdateProfileRequest {
                acting_user,
                update: ProfileUpdate {
                    location: Some(Location::new("Paris").expect("valid location")),
                    ..ProfileUpdate::default()
                },
            })
            .await
            .expect("update succeeds");
        assert_eq!(updated.location().as_ref(), "Paris");
    }

    #[rstest]
    #[tokio::test]
    async fn add_skill_rejects_case_insensitive_duplicates() {
        let acting_user = UserId::random();
        let mut users = MockUserRepository::new();
        let stored = fixture_user(acting_user, Role::User, true);
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = ProfileCommandService::new(Arc::new(users), Arc::new(MockAuditLog::new()));
        let error = service
            .add_skill(AddSkillRequest {
                acting_user,
                side: SkillSide::Offered,
                skill: Skill::new("GUITAR", "louder", SkillLevel::Expert).expect("valid skill"),
            })
            .await
            .expect_err("duplicate rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_missing_skill_is_not_found() {
        let acting_user = UserId::random();
        let mut users = MockUserRepository::new();
        let stored = fixture_user(acting_user, Role::User, true);
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = ProfileCommandService::new(Arc::new(users), Arc::new(MockAuditLog::new()));
        let error = service
            .remove_skill(RemoveSkillRequest {
                acting_user,
                side: SkillSide::Wanted,
                name: "Violin".to_owned(),
            })
            .await
            .expect_err("missing skill");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}

mod moderation {
    use super::*;

    fn repo_with(users_by_id: Vec<User>) -> MockUserRepository {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(move |id| {
            Ok(users_by_id.iter().find(|user| user.id() == id).cloned())
        });
        repo
    }

    #[rstest]
    #[tokio::test]
    async fn ban_requires_admin_role() {
        let actor = UserId::random();
        let target = UserId::random();
        let repo = repo_with(vec![
            fixture_user(actor, Role::User, true),
            fixture_user(target, Role::User, true),
        ]);

        let service = ModerationCommandService::new(Arc::new(repo), Arc::new(MockAuditLog::new()));
        let error = service
            .ban(BanUserRequest {
                acting_user: actor,
                user_id: target,
                reason: None,
            })
            .await
            .expect_err("non-admin rejected");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn admin_bans_with_reason() {
        let admin = UserId::random();
        let target = UserId::random();
        let mut repo = repo_with(vec![
            fixture_user(admin, Role::Admin, true),
            fixture_user(target, Role::User, true),
        ]);
        repo.expect_update()
            .withf(|user| user.is_banned() && user.ban_reason() == Some("spam"))
            .times(1)
            .returning(|_| Ok(()));

        let service = ModerationCommandService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let banned = service
            .ban(BanUserRequest {
                acting_user: admin,
                user_id: target,
                reason: Some("spam".to_owned()),
            })
            .await
            .expect("ban succeeds");
        assert!(banned.is_banned());
    }

    #[rstest]
    #[tokio::test]
    async fn admins_cannot_be_banned() {
        let admin = UserId::random();
        let other_admin = UserId::random();
        let repo = repo_with(vec![
            fixture_user(admin, Role::Admin, true),
            fixture_user(other_admin, Role::Admin, true),
        ]);

        let service = ModerationCommandService::new(Arc::new(repo), Arc::new(MockAuditLog::new()));
        let error = service
            .ban(BanUserRequest {
                acting_user: admin,
                user_id: other_admin,
                reason: None,
            })
            .await
            .expect_err("admin target rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn unban_requires_a_banned_user() {
        let admin = UserId::random();
        let target = UserId::random();
        let repo = repo_with(vec![
            fixture_user(admin, Role::Admin, true),
            fixture_user(target, Role::User, true),
        ]);

        let service = ModerationCommandService::new(Arc::new(repo), Arc::new(MockAuditLog::new()));
        let error = service
            .unban(UnbanUserRequest {
                acting_user: admin,
                user_id: target,
            })
            .await
            .expect_err("not banned");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
