//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use namesake::domain::ports::{FixtureNamePredictor, NoOpEnrichmentObserver};
/// use namesake::domain::{EnrichmentCoordinator, UserService};
/// use namesake::inbound::http::state::HttpState;
/// use namesake::outbound::InMemoryUserRepository;
///
/// let coordinator = EnrichmentCoordinator::new(
///     Arc::new(FixtureNamePredictor),
///     Arc::new(FixtureNamePredictor),
///     Arc::new(FixtureNamePredictor),
///     Arc::new(NoOpEnrichmentObserver),
/// );
/// let service = Arc::new(UserService::new(
///     Arc::new(InMemoryUserRepository::new()),
///     coordinator,
///     Duration::from_secs(10),
/// ));
/// let state = HttpState::new(service.clone(), service);
/// let _users = state.users_query.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub users_command: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
}

impl HttpState {
    pub fn new(users_command: Arc<dyn UsersCommand>, users_query: Arc<dyn UsersQuery>) -> Self {
        Self {
            users_command,
            users_query,
        }
    }
}
