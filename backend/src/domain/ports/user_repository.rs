//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{User, UserDraft, UserId, UserPatch, UserQuery};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Storage for user records.
///
/// `update` and `delete` report the number of affected rows; zero means the
/// identifier did not match a stored user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch one page of users matching the query, plus the total match count.
    async fn find(&self, query: &UserQuery) -> Result<Page<User>, UserPersistenceError>;

    /// Store a freshly enriched draft under `id`.
    async fn insert(&self, id: &UserId, draft: &UserDraft) -> Result<(), UserPersistenceError>;

    /// Write the fields present in `patch`.
    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<u64, UserPersistenceError>;

    /// Remove the user.
    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError>;
}
