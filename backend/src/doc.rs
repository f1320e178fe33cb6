//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers the users endpoints, the health probes and the
//! schemas they reference. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, User};
use crate::inbound::http::schemas::{
    CreateUserBody, CreateUserResponse, UpdateUserBody, UsersPageResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Namesake user directory API",
        description = "Create, list, update and delete users. New users are enriched with \
            predicted age, gender and nationality."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Error,
        ErrorCode,
        CreateUserBody,
        CreateUserResponse,
        UpdateUserBody,
        UsersPageResponse
    )),
    tags(
        (name = "users", description = "User directory operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
