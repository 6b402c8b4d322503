//! Skill-swap backend library modules.
//!
//! The crate is laid out hexagonally: `domain` owns the swap lifecycle and
//! rating engine behind ports, `inbound` adapts HTTP onto the driving ports,
//! and `outbound` implements the driven ports over PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware re-exported for app assembly.
pub use middleware::Trace;
