//! Users API handlers.
//!
//! ```text
//! GET    /api/v1/users?page=1&limit=10&gender=male&order_by=age&order_dir=asc
//! POST   /api/v1/users        {"name":"Ivan","surname":"Petrov"}
//! PATCH  /api/v1/users/{id}   {"age":41}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use pagination::{PageRequest, PaginationError};

use crate::domain::{
    Error, SortDirection, UserFilter, UserOrdering, UserQuery, UserSortField, check_age,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CreateUserBody, CreateUserResponse, ListUsersParams, UpdateUserBody, UsersPageResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_choice_error, invalid_json_error, out_of_range_error, parse_optional_u32,
    parse_required_u64, parse_user_id,
};

const PAGE: FieldName = FieldName::new("page");
const LIMIT: FieldName = FieldName::new("limit");
const AGE: FieldName = FieldName::new("age");
const ORDER_BY: FieldName = FieldName::new("order_by");
const ORDER_DIR: FieldName = FieldName::new("order_dir");

/// Largest accepted JSON request body.
const JSON_BODY_LIMIT: usize = 16 * 1024;

/// JSON extractor configuration answering malformed bodies with the
/// standard error payload.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| invalid_json_error(&err).into())
}

/// Mount the users endpoints on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

fn page_request(params: &ListUsersParams) -> Result<PageRequest, Error> {
    let page = parse_required_u64(params.page.as_deref(), PAGE)?;
    let limit = parse_required_u64(params.limit.as_deref(), LIMIT)?;
    PageRequest::new(page, limit).map_err(|err| match err {
        PaginationError::PageOutOfRange => out_of_range_error(PAGE, err.to_string()),
        PaginationError::LimitOutOfRange { .. } => out_of_range_error(LIMIT, err.to_string()),
    })
}

fn ordering(params: &ListUsersParams) -> Result<UserOrdering, Error> {
    let field = match blank_to_none(params.order_by.clone()) {
        Some(raw) => raw
            .parse::<UserSortField>()
            .map_err(|err| invalid_choice_error(ORDER_BY, &err.value, &UserSortField::ALL))?,
        None => UserSortField::default(),
    };
    let direction = match blank_to_none(params.order_dir.clone()) {
        Some(raw) => raw
            .parse::<SortDirection>()
            .map_err(|err| invalid_choice_error(ORDER_DIR, &err.value, &["asc", "desc"]))?,
        None => SortDirection::default(),
    };
    Ok(UserOrdering { field, direction })
}

/// Validate listing parameters into a domain query.
fn user_query(params: ListUsersParams) -> Result<UserQuery, Error> {
    let page = page_request(&params)?;
    let ordering = ordering(&params)?;
    let age = parse_optional_u32(
        params.age.as_deref().filter(|raw| !raw.trim().is_empty()),
        AGE,
    )?
    .map(check_age)
    .transpose()
    .map_err(|err| out_of_range_error(AGE, err.to_string()))?;
    let filter = UserFilter {
        name: blank_to_none(params.name),
        surname: blank_to_none(params.surname),
        patronymic: blank_to_none(params.patronymic),
        age,
        gender: blank_to_none(params.gender),
        country_code: blank_to_none(params.country_id),
    };
    Ok(UserQuery {
        filter,
        ordering,
        page,
    })
}

/// List users with filters, ordering and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "One page of users", body = UsersPageResponse),
        (status = 400, description = "Invalid query parameter", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<ListUsersParams>,
) -> ApiResult<web::Json<UsersPageResponse>> {
    let query = user_query(params.into_inner())?;
    let page = state.users_query.list_users(&query).await?;
    Ok(web::Json(UsersPageResponse::from(page)))
}

/// Create a user, enriching it with predicted age, gender and nationality.
///
/// Prediction failures never fail the request; the affected fields are left
/// unset.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let id = state
        .users_command
        .create_user(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/v1/users/{id}")))
        .json(CreateUserResponse { id }))
}

/// Update the provided fields of a user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateUserBody,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    state
        .users_command
        .update_user(&id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    state.users_command.delete_user(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
