//! Backend entry-point: wires REST endpoints, health probes, and OpenAPI docs.

use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::Trace;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{
    ServerConfig, build_http_state, build_session_middleware, configure_api,
    run_pending_migrations,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    run_pending_migrations(config.database_url())?;
    let pool = DbPool::new(PoolConfig::new(config.database_url()))
        .await
        .map_err(std::io::Error::other)?;
    let state = web::Data::new(build_http_state(&pool));

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let key = config.session_key();
    let cookie_secure = config.cookie_secure();
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        let session = build_session_middleware(key.clone(), cookie_secure);
        let app = App::new()
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .configure(configure_api(state.clone(), session))
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
