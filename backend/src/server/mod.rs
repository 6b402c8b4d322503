//! Server assembly: configuration, migrations, and route registration.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use diesel::Connection as _;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admin, auth, ratings, swaps, users};

mod config;
mod state_builders;

pub use config::{ConfigError, ServerConfig};
pub use state_builders::build_http_state;

/// SQL migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations over a blocking connection.
///
/// Diesel's migration harness is synchronous; callers run this before the
/// async pool comes up (or on a blocking thread).
pub fn run_pending_migrations(database_url: &str) -> Result<(), std::io::Error> {
    let mut conn = diesel::pg::PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))
}

/// Build the session middleware with the configured key and cookie flags.
#[must_use]
pub fn build_session_middleware(
    key: Key,
    cookie_secure: bool,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Register the `/api/v1` scope with every REST endpoint.
///
/// Returned as a `configure` closure so `main` stays free of the generic
/// service types that middleware wrapping produces.
pub fn configure_api(
    state: web::Data<HttpState>,
    session: SessionMiddleware<CookieSessionStore>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let api = web::scope("/api/v1")
            .wrap(session)
            .app_data(state)
            .service(auth::login)
            .service(auth::logout)
            .service(users::update_profile)
            .service(users::add_skill)
            .service(users::remove_skill)
            .service(users::list_users)
            .service(users::get_user)
            .service(swaps::create_swap)
            .service(swaps::list_swaps)
            .service(swaps::can_rate_swap)
            .service(swaps::accept_swap)
            .service(swaps::reject_swap)
            .service(swaps::cancel_swap)
            .service(swaps::complete_swap)
            .service(swaps::get_swap)
            .service(ratings::submit_rating)
            .service(ratings::list_my_ratings)
            .service(ratings::list_user_ratings)
            .service(ratings::get_rating)
            .service(ratings::update_rating)
            .service(ratings::delete_rating)
            .service(admin::ban_user)
            .service(admin::unban_user);
        cfg.service(api);
    }
}
