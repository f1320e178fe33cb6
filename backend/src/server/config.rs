//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use namesake::domain::EnrichmentCoordinator;
use namesake::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) enrichment: EnrichmentCoordinator,
    pub(crate) enrichment_timeout: Duration,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration storing users in process memory.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        enrichment: EnrichmentCoordinator,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            bind_addr,
            enrichment,
            enrichment_timeout,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; users are then stored in
    /// PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
