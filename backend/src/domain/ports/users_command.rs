//! Driving port for user mutations.
//!
//! Inbound adapters hand over the raw request fields; validation and
//! enrichment happen behind the port.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Fields supplied by a caller creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
}

/// Fields supplied by a caller updating a user. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub country_code: Option<String>,
}

/// Use-case port for creating, updating and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate, enrich and store a new user, returning its identity.
    ///
    /// Enrichment failures never fail creation; only validation and storage
    /// errors do.
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserId, Error>;

    /// Apply a partial update. Unknown identifiers yield
    /// [`crate::domain::ErrorCode::NotFound`].
    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> Result<(), Error>;

    /// Delete a user. Unknown identifiers yield
    /// [`crate::domain::ErrorCode::NotFound`].
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
