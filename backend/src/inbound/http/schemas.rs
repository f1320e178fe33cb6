//! Request and response bodies for the users API.
//!
//! These DTOs carry the wire shape (camelCase JSON, string query params) and
//! convert into the domain port requests. Query parameters are read as
//! strings so every parse failure can name its field.

use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{User, UserId};

/// Body of `POST /api/v1/users`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    #[schema(example = "Ivan")]
    pub name: String,
    #[schema(example = "Petrov")]
    pub surname: String,
    #[serde(default)]
    #[schema(example = "Ivanovich")]
    pub patronymic: Option<String>,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            name: body.name,
            surname: body.surname,
            patronymic: body.patronymic,
        }
    }
}

/// Response of `POST /api/v1/users`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateUserResponse {
    #[schema(value_type = String, format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
}

/// Body of `PATCH /api/v1/users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(minimum = 0, example = 41)]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "female")]
    pub gender: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "UA")]
    pub country_id: Option<String>,
}

impl From<UpdateUserBody> for UpdateUserRequest {
    fn from(body: UpdateUserBody) -> Self {
        Self {
            name: body.name,
            surname: body.surname,
            patronymic: body.patronymic,
            age: body.age,
            gender: body.gender,
            country_code: body.country_id,
        }
    }
}

/// Query string of `GET /api/v1/users`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// One-based page number.
    #[param(value_type = u64, required = true, minimum = 1, example = 1)]
    pub page: Option<String>,
    /// Page size, 1 to 100.
    #[param(value_type = u64, required = true, minimum = 1, maximum = 100, example = 10)]
    pub limit: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    #[param(value_type = Option<u32>, minimum = 0)]
    pub age: Option<String>,
    pub gender: Option<String>,
    pub country_id: Option<String>,
    /// One of `id`, `name`, `surname`, `patronymic`, `age`, `gender`,
    /// `country_id`, `created_at`. Defaults to `created_at`.
    pub order_by: Option<String>,
    /// `asc` or `desc`, case-insensitive. Defaults to `desc`.
    pub order_dir: Option<String>,
}

/// Response of `GET /api/v1/users`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsersPageResponse {
    /// Users matching the filters across all pages.
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub users: Vec<User>,
}

impl From<Page<User>> for UsersPageResponse {
    fn from(page: Page<User>) -> Self {
        let request = page.request();
        let total = page.total();
        Self {
            total,
            page: request.page(),
            limit: request.limit(),
            users: page.into_items(),
        }
    }
}
