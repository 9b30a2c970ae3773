//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Two adapters implement the same store ports over the same schema:
//!
//! - [`DieselStore`] uses `diesel-async` with a `bb8` pool for the
//!   non-blocking deployment.
//! - [`BlockingDieselStore`] uses synchronous Diesel with an `r2d2` pool for
//!   the blocking deployment.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; adapters only translate between them and domain types.
//!
//! # Example
//!
//! ```ignore
//! use playground::outbound::persistence::{DbPool, DieselStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/playground")).await?;
//! let store = DieselStore::new(pool);
//! ```

mod blocking_diesel_store;
mod diesel_error_mapping;
mod diesel_store;
mod diesel_store_macros;
mod migrations;
mod models;
mod pool;
mod schema;

pub use blocking_diesel_store::BlockingDieselStore;
pub use diesel_store::DieselStore;
pub use migrations::run_pending_migrations;
pub use pool::{BlockingDbPool, DbPool, PoolConfig, PoolError};
