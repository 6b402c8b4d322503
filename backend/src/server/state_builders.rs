//! Wiring of persistence adapters into the domain services behind the HTTP
//! state.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::{
    ModerationCommandService, ProfileCommandService, RatingCommandService, RatingQueryService,
    SwapCommandService, SwapQueryService, UsersQueryService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{
    DbPool, DieselAuditLog, DieselRatingRepository, DieselSwapRepository, DieselUserRepository,
};

/// Build the HTTP port bundle over Diesel-backed adapters.
#[must_use]
pub fn build_http_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let swaps = Arc::new(DieselSwapRepository::new(pool.clone()));
    let ratings = Arc::new(DieselRatingRepository::new(pool.clone()));
    let audit = Arc::new(DieselAuditLog::new(pool.clone()));
    let clock = Arc::new(DefaultClock);

    HttpState::new(HttpStatePorts {
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
        moderation: Arc::new(ModerationCommandService::new(users, audit)),
    })
}
