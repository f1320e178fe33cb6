//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL user repository using Diesel ORM
//! - **memory_user_repository**: process-local user repository
//! - **predictors**: reqwest clients for agify, genderize and nationalize
//! - **tracing_observer**: enrichment observations as structured logs
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory_user_repository;
pub mod persistence;
pub mod predictors;
pub mod tracing_observer;

pub use memory_user_repository::InMemoryUserRepository;
pub use tracing_observer::TracingEnrichmentObserver;
