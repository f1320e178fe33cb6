//! Namesake user directory service.
//!
//! Users are created with a name, surname and optional patronymic; the
//! service then asks three remote predictors for the likely age, gender and
//! nationality of the first name and stores whatever came back in time.
//!
//! - `domain`: user model, enrichment workflow and ports.
//! - `inbound`: REST adapter (actix-web).
//! - `outbound`: PostgreSQL and in-memory stores, predictor HTTP clients.
//! - `settings`: OrthoConfig-backed configuration.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
