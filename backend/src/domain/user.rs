//! User data model.
//!
//! A [`UserDraft`] is the in-flight record assembled while a user is being
//! created: caller supplied names plus whatever the enrichment predictors
//! manage to fill in. Once persisted it becomes a [`User`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Name-like fields validated by [`PersonName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Name,
    Surname,
    Patronymic,
}

impl NameField {
    /// Wire name of the field, used in validation details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Patronymic => "patronymic",
        }
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest age a user record holds. Storage keeps ages in a signed 32-bit
/// column.
pub const MAX_AGE: u32 = i32::MAX.unsigned_abs();

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyName { field: NameField },
    AgeOutOfRange { age: u32 },
    EmptyPatch,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName { field } => write!(f, "{field} is empty"),
            Self::AgeOutOfRange { age } => write!(f, "age {age} exceeds {MAX_AGE}"),
            Self::EmptyPatch => write!(f, "no fields provided for update"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Accept `age` when a user record can hold it.
pub fn check_age(age: u32) -> Result<u32, UserValidationError> {
    if age > MAX_AGE {
        Err(UserValidationError::AgeOutOfRange { age })
    } else {
        Ok(age)
    }
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A trimmed, non-empty personal name component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(into = "String")]
#[schema(value_type = String, example = "Ivan")]
pub struct PersonName(String);

impl PersonName {
    /// Trim and validate `value` for the given field.
    pub fn new(value: impl AsRef<str>, field: NameField) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Treat blank input as absent.
    ///
    /// Optional name components such as the patronymic are dropped rather
    /// than rejected when the caller sends only whitespace.
    pub fn optional(value: Option<impl AsRef<str>>) -> Option<Self> {
        value.and_then(|raw| Self::new(raw, NameField::Patronymic).ok())
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

/// User record under construction.
///
/// Callers provide the names; `age`, `gender` and `country_code` are filled
/// only when the corresponding prediction succeeds. Any combination of the
/// three optional fields is a valid final state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: PersonName,
    surname: PersonName,
    patronymic: Option<PersonName>,
    age: Option<u32>,
    gender: Option<String>,
    country_code: Option<String>,
}

impl UserDraft {
    /// Start a draft with the caller supplied names and no predictions.
    pub fn new(name: PersonName, surname: PersonName, patronymic: Option<PersonName>) -> Self {
        Self {
            name,
            surname,
            patronymic,
            age: None,
            gender: None,
            country_code: None,
        }
    }

    /// First name; the key every predictor is asked about.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Family name.
    pub fn surname(&self) -> &PersonName {
        &self.surname
    }

    /// Patronymic, when the caller gave one.
    pub fn patronymic(&self) -> Option<&PersonName> {
        self.patronymic.as_ref()
    }

    /// Predicted age, if the age predictor answered.
    pub fn age(&self) -> Option<u32> {
        self.age
    }

    /// Predicted gender, if the gender predictor answered.
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    /// ISO 3166-1 alpha-2 code of the predicted nationality.
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// Record the predicted age.
    pub fn set_age(&mut self, age: u32) {
        self.age = Some(age);
    }

    /// Record the predicted gender.
    pub fn set_gender(&mut self, gender: impl Into<String>) {
        self.gender = Some(gender.into());
    }

    /// Record the predicted nationality code.
    pub fn set_country_code(&mut self, country_code: impl Into<String>) {
        self.country_code = Some(country_code.into());
    }
}

/// Persisted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    name: PersonName,
    surname: PersonName,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    patronymic: Option<PersonName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 30)]
    age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "male")]
    gender: Option<String>,
    #[serde(rename = "countryId", skip_serializing_if = "Option::is_none")]
    #[schema(example = "RU")]
    country_code: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Combine an identity with the draft that was stored for it.
    pub fn from_draft(id: UserId, draft: UserDraft, created_at: DateTime<Utc>) -> Self {
        let UserDraft {
            name,
            surname,
            patronymic,
            age,
            gender,
            country_code,
        } = draft;
        Self {
            id,
            name,
            surname,
            patronymic,
            age,
            gender,
            country_code,
            created_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// First name.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Family name.
    pub fn surname(&self) -> &PersonName {
        &self.surname
    }

    /// Patronymic, if any.
    pub fn patronymic(&self) -> Option<&PersonName> {
        self.patronymic.as_ref()
    }

    /// Stored age, predicted or set by an update.
    pub fn age(&self) -> Option<u32> {
        self.age
    }

    /// Stored gender, predicted or set by an update.
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    /// ISO 3166-1 alpha-2 nationality code.
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// When the record was first stored.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a patch in place, leaving absent fields untouched.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(surname) = &patch.surname {
            self.surname = surname.clone();
        }
        if let Some(patronymic) = &patch.patronymic {
            self.patronymic = Some(patronymic.clone());
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
        if let Some(gender) = &patch.gender {
            self.gender = Some(gender.clone());
        }
        if let Some(country_code) = &patch.country_code {
            self.country_code = Some(country_code.clone());
        }
    }
}

/// Partial update of a stored user.
///
/// Only the fields that are `Some` are written. A patch with no fields is
/// rejected by [`UserPatch::ensure_not_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<PersonName>,
    pub surname: Option<PersonName>,
    pub patronymic: Option<PersonName>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub country_code: Option<String>,
}

impl UserPatch {
    /// Whether the patch would leave the record unchanged.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.patronymic.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.country_code.is_none()
    }

    /// Reject patches that carry no fields.
    pub fn ensure_not_empty(&self) -> Result<(), UserValidationError> {
        if self.is_empty() {
            Err(UserValidationError::EmptyPatch)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
