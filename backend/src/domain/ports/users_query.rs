//! Driving port for user listings.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch users without
//! importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, User, UserQuery};

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return one page of users matching the query.
    async fn list_users(&self, query: &UserQuery) -> Result<Page<User>, Error>;
}
