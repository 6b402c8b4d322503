//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{
    MockModerationCommand, MockProfileCommand, MockRatingCommand, MockRatingQuery,
    MockSwapCommand, MockSwapQuery, MockUsersQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock port bundle for handler tests.
///
/// Unconfigured mocks panic when called, so each test only sets expectations
/// on the ports its handler touches.
#[derive(Default)]
pub struct TestPorts {
    /// Swap lifecycle command mock.
    pub swaps: MockSwapCommand,
    /// Swap query mock.
    pub swaps_query: MockSwapQuery,
    /// Rating command mock.
    pub ratings: MockRatingCommand,
    /// Rating query mock.
    pub ratings_query: MockRatingQuery,
    /// User directory mock.
    pub users_query: MockUsersQuery,
    /// Profile command mock.
    pub profile: MockProfileCommand,
    /// Moderation command mock.
    pub moderation: MockModerationCommand,
}

impl TestPorts {
    /// Wrap the configured mocks into handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            swaps: Arc::new(self.swaps),
            swaps_query: Arc::new(self.swaps_query),
            ratings: Arc::new(self.ratings),
            ratings_query: Arc::new(self.ratings_query),
            users_query: Arc::new(self.users_query),
            profile: Arc::new(self.profile),
            moderation: Arc::new(self.moderation),
        }))
    }
}

/// Route that binds the path's user id to the session, standing in for the
/// login flow in handler tests.
pub fn test_login_route() -> actix_web::Resource {
    web::resource("/test-login/{id}").route(web::get().to(
        |session: SessionContext, path: web::Path<String>| async move {
            let id = UserId::new(path.into_inner())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            session.persist_user(&id)?;
            Ok::<_, Error>(HttpResponse::Ok())
        },
    ))
}

/// Log `user_id` in through [`test_login_route`] and return the session
/// cookie for follow-up requests.
pub async fn login_cookie<S, B>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test-login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "test login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
