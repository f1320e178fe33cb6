//! Internal Diesel row structs.
//!
//! Never exposed to the domain; the repository converts at its boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::users;

/// Row read from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub country_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable user record; timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub surname: &'a str,
    pub patronymic: Option<&'a str>,
    pub age: Option<i32>,
    pub gender: Option<&'a str>,
    pub country_id: Option<&'a str>,
}

/// Partial update. `None` fields are left out of the `SET` clause.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub surname: Option<&'a str>,
    pub patronymic: Option<&'a str>,
    pub age: Option<i32>,
    pub gender: Option<&'a str>,
    pub country_id: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
