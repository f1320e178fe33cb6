//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - Repositories only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and the table definition (`schema.rs`) stay
//!   private to this module.
//! - Connections come from a `bb8` pool through `diesel-async`.
//! - Database errors are mapped to [`UserPersistenceError`] variants.
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use namesake::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/namesake")).await?;
//! let repository = DieselUserRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```
//!
//! [`UserPersistenceError`]: crate::domain::ports::UserPersistenceError

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
