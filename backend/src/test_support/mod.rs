//! In-memory port implementations and fixtures for integration tests.
//!
//! The repositories honour the same contracts as the Diesel adapters: swap
//! transitions are compare-and-swap under one lock, the pending-pair and
//! `(swap, rater)` uniqueness guards are enforced at insert, and completion
//! applies the status change and both counter increments atomically.

#![expect(
    clippy::expect_used,
    clippy::missing_panics_doc,
    reason = "test fixtures fail loudly on impossible states instead of threading errors"
)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::audit::AuditRecord;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::{
    AuditLog, AuditLogError, RatingRepository, RatingRepositoryError, SwapDirection, SwapFilter,
    SwapRepository, SwapRepositoryError, UserRepository, UserRepositoryError, UserSearch,
};
use crate::domain::rating::{Rating, RatingStats};
use crate::domain::skill::{Skill, SkillLevel};
use crate::domain::swap::{SwapDraft, SwapRequest, SwapStatus};
use crate::domain::user::{
    Availability, DisplayName, Location, Role, User, UserDraft, UserId,
};
use crate::domain::{
    ModerationCommandService, ProfileCommandService, RatingCommandService, RatingQueryService,
    SwapCommandService, SwapQueryService, UsersQueryService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Deterministic clock for tests.
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// A clock pinned to an arbitrary fixed instant.
    #[must_use]
    pub fn fixed() -> Self {
        Self {
            utc_now: Utc
                .with_ymd_and_hms(2026, 4, 1, 12, 0, 0)
                .single()
                .expect("valid fixture timestamp"),
        }
    }

    /// The instant every reading returns.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex
        .lock()
        .unwrap_or_else(|_| panic!("{what} lock poisoned"))
}

/// Build a user with the given offered/wanted skill names.
#[must_use]
pub fn fixture_user(id: UserId, name: &str, offered: &[&str], wanted: &[&str]) -> User {
    let build = |names: &[&str]| {
        names
            .iter()
            .map(|skill| Skill::new(*skill, "a description", SkillLevel::Intermediate))
            .collect::<Result<Vec<_>, _>>()
            .expect("fixture skills")
    };
    User::new(UserDraft {
        id,
        display_name: DisplayName::new(name).expect("fixture name"),
        location: Location::new("Fixture Town").expect("fixture location"),
        availability: Availability::Flexible,
        skills_offered: build(offered),
        skills_wanted: build(wanted),
        is_profile_public: true,
        role: Role::User,
        is_banned: false,
        ban_reason: None,
        rating_stats: RatingStats::default(),
        completed_swaps: 0,
    })
    .expect("fixture user")
}

/// Build an admin user with no listed skills.
#[must_use]
pub fn fixture_admin(id: UserId, name: &str) -> User {
    User::new(UserDraft {
        id,
        display_name: DisplayName::new(name).expect("fixture name"),
        location: Location::new("Fixture Town").expect("fixture location"),
        availability: Availability::Flexible,
        skills_offered: Vec::new(),
        skills_wanted: Vec::new(),
        is_profile_public: false,
        role: Role::Admin,
        is_banned: false,
        ban_reason: None,
        rating_stats: RatingStats::default(),
        completed_swaps: 0,
    })
    .expect("fixture admin")
}

/// In-memory user store.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user, replacing any previous entry with the same id.
    pub fn seed(&self, user: User) {
        lock(&self.users, "users").insert(*user.id().as_uuid(), user);
    }

    /// Read back a user for assertions.
    #[must_use]
    pub fn get(&self, id: &UserId) -> Option<User> {
        lock(&self.users, "users").get(id.as_uuid()).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(lock(&self.users, "users").get(user_id.as_uuid()).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        self.seed(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        self.seed(user.clone());
        Ok(())
    }

    async fn set_rating_stats(
        &self,
        user_id: &UserId,
        stats: RatingStats,
    ) -> Result<(), UserRepositoryError> {
        let mut users = lock(&self.users, "users");
        if let Some(user) = users.get_mut(user_id.as_uuid()) {
            user.set_rating_stats(stats);
        }
        Ok(())
    }

    async fn list_public(
        &self,
        search: UserSearch,
        page: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let users = lock(&self.users, "users");
        let mut matching: Vec<User> = users
            .values()
            .filter(|user| user.is_profile_public() && !user.is_banned())
            .filter(|user| {
                search.skill.as_deref().is_none_or(|skill| {
                    user.skills_offered()
                        .iter()
                        .chain(user.skills_wanted())
                        .any(|listed| listed.name_matches(skill))
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.display_name().as_ref().cmp(b.display_name().as_ref()));
        Ok(paginate(matching, page))
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let items = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();
    Page::new(items, page, total)
}

fn rebuild_swap(
    swap: &SwapRequest,
    status: SwapStatus,
    completed_date: Option<DateTime<Utc>>,
    is_rated: bool,
) -> SwapRequest {
    SwapRequest::new(SwapDraft {
        id: swap.id(),
        requester: *swap.requester(),
        recipient: *swap.recipient(),
        requested_skill: swap.requested_skill().clone(),
        offered_skill: swap.offered_skill().clone(),
        status,
        message: swap.message().map(str::to_owned),
        scheduled_date: swap.scheduled_date(),
        completed_date,
        is_rated,
        created_at: swap.created_at(),
    })
    .expect("rebuilt swap stays valid")
}

/// In-memory swap store sharing the user store so completion can bump both
/// participants' counters atomically under one lock.
pub struct InMemorySwaps {
    swaps: Mutex<HashMap<Uuid, SwapRequest>>,
    users: Arc<InMemoryUsers>,
}

impl InMemorySwaps {
    /// Empty store over the given user store.
    #[must_use]
    pub fn new(users: Arc<InMemoryUsers>) -> Self {
        Self {
            swaps: Mutex::new(HashMap::new()),
            users,
        }
    }

    /// Read back a swap for assertions.
    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<SwapRequest> {
        lock(&self.swaps, "swaps").get(id).cloned()
    }
}

#[async_trait]
impl SwapRepository for InMemorySwaps {
    async fn insert(&self, swap: &SwapRequest) -> Result<(), SwapRepositoryError> {
        let mut swaps = lock(&self.swaps, "swaps");
        let duplicate = swap.status() == SwapStatus::Pending
            && swaps.values().any(|existing| {
                existing.status() == SwapStatus::Pending
                    && (existing.involves(swap.requester()) && existing.involves(swap.recipient()))
            });
        if duplicate {
            return Err(SwapRepositoryError::duplicate_pending(
                "concurrent create detected",
            ));
        }
        swaps.insert(swap.id(), swap.clone());
        Ok(())
    }

    async fn find_by_id(&self, swap_id: &Uuid) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        Ok(lock(&self.swaps, "swaps").get(swap_id).cloned())
    }

    async fn find_pending_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        Ok(lock(&self.swaps, "swaps")
            .values()
            .find(|swap| {
                swap.status() == SwapStatus::Pending && swap.involves(a) && swap.involves(b)
            })
            .cloned())
    }

    async fn transition(
        &self,
        swap_id: &Uuid,
        from: SwapStatus,
        to: SwapStatus,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        let mut swaps = lock(&self.swaps, "swaps");
        let Some(current) = swaps.get(swap_id) else {
            return Ok(None);
        };
        if current.status() != from {
            return Ok(None);
        }
        let updated = rebuild_swap(current, to, current.completed_date(), current.is_rated());
        swaps.insert(*swap_id, updated.clone());
        Ok(Some(updated))
    }

    async fn complete(
        &self,
        swap_id: &Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<SwapRequest>, SwapRepositoryError> {
        let mut swaps = lock(&self.swaps, "swaps");
        let Some(current) = swaps.get(swap_id) else {
            return Ok(None);
        };
        if current.status() != SwapStatus::Accepted {
            return Ok(None);
        }
        let updated = rebuild_swap(
            current,
            SwapStatus::Completed,
            Some(completed_at),
            current.is_rated(),
        );
        swaps.insert(*swap_id, updated.clone());

        let mut users = lock(&self.users.users, "users");
        for participant in [updated.requester(), updated.recipient()] {
            if let Some(user) = users.get_mut(participant.as_uuid()) {
                user.record_completed_swap();
            }
        }
        Ok(Some(updated))
    }

    async fn mark_rated(&self, swap_id: &Uuid) -> Result<(), SwapRepositoryError> {
        let mut swaps = lock(&self.swaps, "swaps");
        if let Some(current) = swaps.get(swap_id) {
            let updated = rebuild_swap(current, current.status(), current.completed_date(), true);
            swaps.insert(*swap_id, updated);
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: SwapFilter,
        page: PageRequest,
    ) -> Result<Page<SwapRequest>, SwapRepositoryError> {
        let swaps = lock(&self.swaps, "swaps");
        let mut matching: Vec<SwapRequest> = swaps
            .values()
            .filter(|swap| match filter.direction {
                SwapDirection::Incoming => swap.recipient() == user_id,
                SwapDirection::Outgoing => swap.requester() == user_id,
                SwapDirection::All => swap.involves(user_id),
            })
            .filter(|swap| filter.status.is_none_or(|status| swap.status() == status))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then(b.id().cmp(&a.id())));
        Ok(paginate(matching, page))
    }
}

/// In-memory rating store.
#[derive(Default)]
pub struct InMemoryRatings {
    ratings: Mutex<HashMap<Uuid, Rating>>,
}

impl InMemoryRatings {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatings {
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError> {
        let mut ratings = lock(&self.ratings, "ratings");
        let duplicate = ratings.values().any(|existing| {
            existing.swap_request_id() == rating.swap_request_id()
                && existing.rater() == rating.rater()
        });
        if duplicate {
            return Err(RatingRepositoryError::duplicate(
                "concurrent insert detected",
            ));
        }
        ratings.insert(rating.id(), rating.clone());
        Ok(())
    }

    async fn find_by_id(&self, rating_id: &Uuid) -> Result<Option<Rating>, RatingRepositoryError> {
        Ok(lock(&self.ratings, "ratings").get(rating_id).cloned())
    }

    async fn exists_for(
        &self,
        swap_id: &Uuid,
        rater: &UserId,
    ) -> Result<bool, RatingRepositoryError> {
        Ok(lock(&self.ratings, "ratings")
            .values()
            .any(|rating| rating.swap_request_id() == *swap_id && rating.rater() == rater))
    }

    async fn update(&self, rating: &Rating) -> Result<(), RatingRepositoryError> {
        lock(&self.ratings, "ratings").insert(rating.id(), rating.clone());
        Ok(())
    }

    async fn delete(&self, rating_id: &Uuid) -> Result<(), RatingRepositoryError> {
        lock(&self.ratings, "ratings").remove(rating_id);
        Ok(())
    }

    async fn list_for_rated(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError> {
        let ratings = lock(&self.ratings, "ratings");
        let mut matching: Vec<Rating> = ratings
            .values()
            .filter(|rating| rating.rated_user() == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then(b.id().cmp(&a.id())));
        Ok(paginate(matching, page))
    }

    async fn list_by_rater(
        &self,
        rater: &UserId,
        page: PageRequest,
    ) -> Result<Page<Rating>, RatingRepositoryError> {
        let ratings = lock(&self.ratings, "ratings");
        let mut matching: Vec<Rating> = ratings
            .values()
            .filter(|rating| rating.rater() == rater)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then(b.id().cmp(&a.id())));
        Ok(paginate(matching, page))
    }

    async fn stats_for(&self, user_id: &UserId) -> Result<RatingStats, RatingRepositoryError> {
        let ratings = lock(&self.ratings, "ratings");
        Ok(RatingStats::from_scores(
            ratings
                .values()
                .filter(|rating| rating.rated_user() == user_id)
                .map(|rating| rating.score()),
        ))
    }
}

/// Audit sink that keeps every record for assertions.
#[derive(Default)]
pub struct RecordingAuditLog {
    records: Mutex<Vec<AuditRecord>>,
}

impl RecordingAuditLog {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        lock(&self.records, "audit records").clone()
    }
}

#[async_trait]
impl AuditLog for RecordingAuditLog {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditLogError> {
        lock(&self.records, "audit records").push(record);
        Ok(())
    }
}

/// Everything an integration test needs: the in-memory stores plus services
/// wired exactly as production wires the Diesel adapters.
pub struct TestHarness {
    /// Shared user store.
    pub users: Arc<InMemoryUsers>,
    /// Shared swap store.
    pub swaps: Arc<InMemorySwaps>,
    /// Shared rating store.
    pub ratings: Arc<InMemoryRatings>,
    /// Shared audit sink.
    pub audit: Arc<RecordingAuditLog>,
    /// The instant the fixture clock returns.
    pub now: DateTime<Utc>,
    /// HTTP state over the stores.
    pub state: HttpState,
}

impl TestHarness {
    /// Build a harness over fresh stores.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUsers::new());
        let swaps = Arc::new(InMemorySwaps::new(Arc::clone(&users)));
        let ratings = Arc::new(InMemoryRatings::new());
        let audit = Arc::new(RecordingAuditLog::new());
        let clock = Arc::new(FixtureClock::fixed());
        let now = clock.now();

        let state = HttpState::new(HttpStatePorts {
            swaps: Arc::new(SwapCommandService::new(
                Arc::clone(&swaps),
                Arc::clone(&users),
                Arc::clone(&audit),
                clock.clone(),
            )),
            swaps_query: Arc::new(SwapQueryService::new(Arc::clone(&swaps))),
            ratings: Arc::new(RatingCommandService::new(
                Arc::clone(&ratings),
                Arc::clone(&swaps),
                Arc::clone(&users),
                Arc::clone(&audit),
                clock,
            )),
            ratings_query: Arc::new(RatingQueryService::new(
                Arc::clone(&ratings),
                Arc::clone(&swaps),
                Arc::clone(&users),
            )),
            users_query: Arc::new(UsersQueryService::new(Arc::clone(&users))),
            profile: Arc::new(ProfileCommandService::new(
                Arc::clone(&users),
                Arc::clone(&audit),
            )),
            moderation: Arc::new(ModerationCommandService::new(
                Arc::clone(&users),
                Arc::clone(&audit),
            )),
        });

        Self {
            users,
            swaps,
            ratings,
            audit,
            now,
            state,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
