//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.

mod diesel_audit_log;
mod diesel_basic_error_mapping;
mod diesel_rating_repository;
mod diesel_swap_repository;
mod diesel_user_repository;
mod json_serializers;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_audit_log::DieselAuditLog;
pub use diesel_rating_repository::DieselRatingRepository;
pub use diesel_swap_repository::DieselSwapRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
