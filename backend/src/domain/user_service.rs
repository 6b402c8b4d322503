//! User-facing domain services: directory queries, profile and skill-list
//! commands, and admin moderation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::audit::{AuditAction, AuditRecord};
use crate::domain::error::Error;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::{
    AddSkillRequest, AuditLog, BanUserRequest, ModerationCommand, ProfileCommand,
    RemoveSkillRequest, UnbanUserRequest, UpdateProfileRequest, UserRepository,
    UserRepositoryError, UserSearch, UsersQuery, record_best_effort,
};
use crate::domain::user::{Role, User, UserId};

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn user_not_found(user_id: UserId) -> Error {
    Error::not_found(format!("user {user_id} not found"))
}

async fn load_user<U>(users: &U, user_id: UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(&user_id)
        .await
        .map_err(map_user_repository_error)?
        .ok_or_else(|| user_not_found(user_id))
}

/// User directory service implementing the query driving port.
#[derive(Clone)]
pub struct UsersQueryService<U> {
    users: Arc<U>,
}

impl<U> UsersQueryService<U> {
    /// Create a new query service over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UsersQuery for UsersQueryService<U>
where
    U: UserRepository,
{
    async fn get_user(&self, user_id: UserId) -> Result<User, Error> {
        load_user(self.users.as_ref(), user_id).await
    }

    async fn get_profile(&self, user_id: UserId, viewer: Option<UserId>) -> Result<User, Error> {
        let user = load_user(self.users.as_ref(), user_id).await?;
        if !user.is_profile_public() && viewer != Some(user_id) {
            return Err(Error::forbidden("this profile is private"));
        }
        Ok(user)
    }

    async fn list(&self, search: UserSearch, page: PageRequest) -> Result<Page<User>, Error> {
        self.users
            .list_public(search, page)
            .await
            .map_err(map_user_repository_error)
    }
}

/// Profile service implementing the command driving port.
#[derive(Clone)]
pub struct ProfileCommandService<U, A> {
    users: Arc<U>,
    audit: Arc<A>,
}

impl<U, A> ProfileCommandService<U, A> {
    /// Create a new command service over the user repository.
    pub fn new(users: Arc<U>, audit: Arc<A>) -> Self {
        Self { users, audit }
    }
}

#[async_trait]
impl<U, A> ProfileCommand for ProfileCommandService<U, A>
where
    U: UserRepository,
    A: AuditLog,
{
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<User, Error> {
        let UpdateProfileRequest {
            acting_user,
            update,
        } = request;

        let mut user = load_user(self.users.as_ref(), acting_user).await?;
        user.apply_profile_update(update);
        self.users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;

        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(acting_user, AuditAction::ProfileUpdated),
        )
        .await;

        Ok(user)
    }

    async fn add_skill(&self, request: AddSkillRequest) -> Result<User, Error> {
        let AddSkillRequest {
            acting_user,
            side,
            skill,
        } = request;

        let mut user = load_user(self.users.as_ref(), acting_user).await?;
        let skill_name = skill.name().to_owned();
        user.add_skill(side, skill).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "side": side.as_str(), "code": "duplicate_skill" }))
        })?;
        self.users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;

        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(acting_user, AuditAction::SkillAdded)
                .with_details(json!({ "skill": skill_name, "side": side.as_str() })),
        )
        .await;

        Ok(user)
    }

    async fn remove_skill(&self, request: RemoveSkillRequest) -> Result<User, Error> {
        let RemoveSkillRequest {
            acting_user,
            side,
            name,
        } = request;

        let mut user = load_user(self.users.as_ref(), acting_user).await?;
        let removed = user.remove_skill(side, &name).ok_or_else(|| {
            Error::not_found(format!("skill not found in your {side} skills"))
        })?;
        self.users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;

        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(acting_user, AuditAction::SkillRemoved)
                .with_details(json!({ "skill": removed.name(), "side": side.as_str() })),
        )
        .await;

        Ok(user)
    }
}

/// Moderation service implementing the admin command driving port.
#[derive(Clone)]
pub struct ModerationCommandService<U, A> {
    users: Arc<U>,
    audit: Arc<A>,
}

impl<U, A> ModerationCommandService<U, A> {
    /// Create a new moderation service over the user repository.
    pub fn new(users: Arc<U>, audit: Arc<A>) -> Self {
        Self { users, audit }
    }
}

impl<U, A> ModerationCommandService<U, A>
where
    U: UserRepository,
    A: AuditLog,
{
    async fn require_admin(&self, acting_user: UserId) -> Result<(), Error> {
        let actor = load_user(self.users.as_ref(), acting_user).await?;
        if actor.role() != Role::Admin {
            return Err(Error::forbidden("admin access required"));
        }
        Ok(())
    }
}

#[async_trait]
impl<U, A> ModerationCommand for ModerationCommandService<U, A>
where
    U: UserRepository,
    A: AuditLog,
{
    async fn ban(&self, request: BanUserRequest) -> Result<User, Error> {
        let BanUserRequest {
            acting_user,
            user_id,
            reason,
        } = request;

        self.require_admin(acting_user).await?;
        let mut user = load_user(self.users.as_ref(), user_id).await?;
        if user.role() == Role::Admin {
            return Err(Error::invalid_request("administrators cannot be banned"));
        }
        if user.is_banned() {
            return Err(Error::invalid_request("user is already banned"));
        }

        user.ban(reason.clone());
        self.users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;

        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(acting_user, AuditAction::UserBanned)
                .with_target_user(user_id)
                .with_details(json!({ "reason": reason })),
        )
        .await;

        Ok(user)
    }

    async fn unban(&self, request: UnbanUserRequest) -> Result<User, Error> {
        let UnbanUserRequest {
            acting_user,
            user_id,
        } = request;

        self.require_admin(acting_user).await?;
        let mut user = load_user(self.users.as_ref(), user_id).await?;
        if !user.is_banned() {
            return Err(Error::invalid_request("user is not banned"));
        }

        user.unban();
        self.users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;

        record_best_effort(
            self.audit.as_ref(),
            AuditRecord::new(acting_user, AuditAction::UserUnbanned).with_target_user(user_id),
        )
        .await;

        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
