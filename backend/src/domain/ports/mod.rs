//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod enrichment_observer;
mod name_predictor;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use enrichment_observer::MockEnrichmentObserver;
pub use enrichment_observer::{
    EnrichmentEvent, EnrichmentObserver, EnrichmentOutcome, NoOpEnrichmentObserver, PredictorKind,
};
pub use name_predictor::{
    AgePrediction, CountryProbability, FixtureNamePredictor, GenderPrediction, NamePredictor,
    NationalityPrediction, PredictionError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{CreateUserRequest, UpdateUserRequest, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
