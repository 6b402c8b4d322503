//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ModerationCommand, ProfileCommand, RatingCommand, RatingQuery, SwapCommand, SwapQuery,
    UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Swap lifecycle commands.
    pub swaps: Arc<dyn SwapCommand>,
    /// Swap reads.
    pub swaps_query: Arc<dyn SwapQuery>,
    /// Rating commands.
    pub ratings: Arc<dyn RatingCommand>,
    /// Rating reads.
    pub ratings_query: Arc<dyn RatingQuery>,
    /// User directory reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Own-profile commands.
    pub profile: Arc<dyn ProfileCommand>,
    /// Admin moderation commands.
    pub moderation: Arc<dyn ModerationCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Swap lifecycle commands.
    pub swaps: Arc<dyn SwapCommand>,
    /// Swap reads.
    pub swaps_query: Arc<dyn SwapQuery>,
    /// Rating commands.
    pub ratings: Arc<dyn RatingCommand>,
    /// Rating reads.
    pub ratings_query: Arc<dyn RatingQuery>,
    /// User directory reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Own-profile commands.
    pub profile: Arc<dyn ProfileCommand>,
    /// Admin moderation commands.
    pub moderation: Arc<dyn ModerationCommand>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            swaps,
            swaps_query,
            ratings,
            ratings_query,
            users_query,
            profile,
            moderation,
        } = ports;
        Self {
            swaps,
            swaps_query,
            ratings,
            ratings_query,
            users_query,
            profile,
            moderation,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
