//! User directory service.
//!
//! Implements the user driving ports. Creation validates the caller's names,
//! enriches the draft through the [`EnrichmentCoordinator`] and stores it
//! exactly once; enrichment problems never fail the request. Updates and
//! deletes report unknown identifiers as not found.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CreateUserRequest, UpdateUserRequest, UserPersistenceError, UserRepository, UsersCommand,
    UsersQuery,
};
use crate::domain::{
    EnrichmentCoordinator, Error, MAX_AGE, NameField, PersonName, User, UserDraft, UserId,
    UserPatch, UserQuery, UserValidationError, check_age,
};

/// User service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserService<R> {
    repository: Arc<R>,
    enrichment: EnrichmentCoordinator,
    enrichment_timeout: Duration,
}

impl<R> UserService<R> {
    /// Create a service storing users in `repository`.
    ///
    /// `enrichment_timeout` bounds how long creation waits for predictions.
    pub fn new(
        repository: Arc<R>,
        enrichment: EnrichmentCoordinator,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            enrichment,
            enrichment_timeout,
        }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn validation_error(error: UserValidationError) -> Error {
    let details = match &error {
        UserValidationError::EmptyName { field } => {
            json!({ "field": field.as_str(), "code": "empty_field" })
        }
        UserValidationError::AgeOutOfRange { .. } => {
            json!({ "field": "age", "code": "out_of_range", "max": MAX_AGE })
        }
        UserValidationError::EmptyPatch => json!({ "code": "empty_patch" }),
        UserValidationError::EmptyId | UserValidationError::InvalidId => {
            json!({ "field": "id", "code": "invalid_uuid" })
        }
    };
    Error::invalid_request(error.to_string()).with_details(details)
}

fn required_name(value: &str, field: NameField) -> Result<PersonName, Error> {
    PersonName::new(value, field).map_err(validation_error)
}

fn optional_name(value: Option<&str>, field: NameField) -> Result<Option<PersonName>, Error> {
    value.map(|raw| required_name(raw, field)).transpose()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

fn build_patch(request: UpdateUserRequest) -> Result<UserPatch, Error> {
    let patch = UserPatch {
        name: optional_name(request.name.as_deref(), NameField::Name)?,
        surname: optional_name(request.surname.as_deref(), NameField::Surname)?,
        patronymic: optional_name(request.patronymic.as_deref(), NameField::Patronymic)?,
        age: request
            .age
            .map(check_age)
            .transpose()
            .map_err(validation_error)?,
        gender: trimmed(request.gender),
        country_code: trimmed(request.country_code),
    };
    patch.ensure_not_empty().map_err(validation_error)?;
    Ok(patch)
}

fn not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found")).with_details(json!({ "id": id.as_ref() }))
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository + 'static,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserId, Error> {
        let CreateUserRequest {
            name,
            surname,
            patronymic,
        } = request;
        let name = required_name(&name, NameField::Name)?;
        let surname = required_name(&surname, NameField::Surname)?;
        let draft = UserDraft::new(name, surname, PersonName::optional(patronymic));

        let id = UserId::random();
        let draft = self.enrichment.enrich(draft, self.enrichment_timeout).await;
        self.repository
            .insert(&id, &draft)
            .await
            .map_err(map_persistence_error)?;

        info!(
            user_id = %id,
            age = ?draft.age(),
            gender = ?draft.gender(),
            country_code = ?draft.country_code(),
            "user created"
        );
        Ok(id)
    }

    async fn update_user(&self, id: &UserId, request: UpdateUserRequest) -> Result<(), Error> {
        let patch = build_patch(request)?;
        let affected = self
            .repository
            .update(id, &patch)
            .await
            .map_err(map_persistence_error)?;
        if affected == 0 {
            return Err(not_found(id));
        }
        info!(user_id = %id, "user updated");
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let affected = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if affected == 0 {
            return Err(not_found(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository + 'static,
{
    async fn list_users(&self, query: &UserQuery) -> Result<Page<User>, Error> {
        self.repository
            .find(query)
            .await
            .map_err(map_persistence_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
