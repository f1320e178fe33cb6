//! Builders for HTTP state from the configured user store.

use std::sync::Arc;

use actix_web::web;

use namesake::domain::UserService;
use namesake::domain::ports::UserRepository;
use namesake::inbound::http::state::HttpState;
use namesake::outbound::InMemoryUserRepository;
use namesake::outbound::persistence::DieselUserRepository;

use super::ServerConfig;

/// Wrap one service in both driving ports.
fn service_state<R>(repository: R, config: &ServerConfig) -> HttpState
where
    R: UserRepository + 'static,
{
    let service = Arc::new(UserService::new(
        Arc::new(repository),
        config.enrichment.clone(),
        config.enrichment_timeout,
    ));
    HttpState::new(service.clone(), service)
}

/// Build handler state, using PostgreSQL when a pool is configured and the
/// in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => service_state(DieselUserRepository::new(pool.clone()), config),
        None => service_state(InMemoryUserRepository::new(), config),
    };
    web::Data::new(state)
}
