//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Listing applies one boxed filter to both the count and the page query so
//! `total` always describes the same result set the page was cut from.
//! Ordering always ends on `id` to keep pages stable when the sort column
//! has duplicates.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    NameField, PersonName, SortDirection, User, UserDraft, UserFilter, UserId, UserPatch,
    UserQuery, UserSortField,
};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            UserPersistenceError::query("value rejected by database constraint")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

fn age_to_db(age: u32) -> Result<i32, UserPersistenceError> {
    i32::try_from(age).map_err(|_| UserPersistenceError::query("age exceeds storage range"))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let name = PersonName::new(&row.name, NameField::Name)
        .map_err(|err| UserPersistenceError::query(format!("stored user {}: {err}", row.id)))?;
    let surname = PersonName::new(&row.surname, NameField::Surname)
        .map_err(|err| UserPersistenceError::query(format!("stored user {}: {err}", row.id)))?;
    let mut draft = UserDraft::new(name, surname, PersonName::optional(row.patronymic));
    if let Some(age) = row.age {
        let age = u32::try_from(age).map_err(|_| {
            UserPersistenceError::query(format!("stored user {} has negative age", row.id))
        })?;
        draft.set_age(age);
    }
    if let Some(gender) = row.gender {
        draft.set_gender(gender);
    }
    if let Some(country_id) = row.country_id {
        draft.set_country_code(country_id);
    }
    Ok(User::from_draft(
        UserId::from_uuid(row.id),
        draft,
        row.created_at,
    ))
}

/// Boxed `users` query restricted by every filter that is set.
fn filtered(filter: &UserFilter) -> Result<users::BoxedQuery<'_, Pg>, UserPersistenceError> {
    let mut query = users::table.into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(users::name.eq(name.as_str()));
    }
    if let Some(surname) = &filter.surname {
        query = query.filter(users::surname.eq(surname.as_str()));
    }
    if let Some(patronymic) = &filter.patronymic {
        query = query.filter(users::patronymic.eq(patronymic.as_str()));
    }
    if let Some(age) = filter.age {
        query = query.filter(users::age.eq(age_to_db(age)?));
    }
    if let Some(gender) = &filter.gender {
        query = query.filter(users::gender.eq(gender.as_str()));
    }
    if let Some(country_code) = &filter.country_code {
        query = query.filter(users::country_id.eq(country_code.as_str()));
    }
    Ok(query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find(&self, query: &UserQuery) -> Result<Page<User>, UserPersistenceError> {
        let offset = i64::try_from(query.page.offset())
            .map_err(|_| UserPersistenceError::query("page offset exceeds i64 range"))?;
        let limit = i64::try_from(query.page.limit())
            .map_err(|_| UserPersistenceError::query("page limit exceeds i64 range"))?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(&query.filter)?
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let base = filtered(&query.filter)?;
        macro_rules! order_by {
            ($column:expr) => {
                match query.ordering.direction {
                    SortDirection::Asc => base.order_by($column.asc()),
                    SortDirection::Desc => base.order_by($column.desc()),
                }
            };
        }
        let ordered = match query.ordering.field {
            UserSortField::Id => order_by!(users::id),
            UserSortField::Name => order_by!(users::name),
            UserSortField::Surname => order_by!(users::surname),
            UserSortField::Patronymic => order_by!(users::patronymic),
            UserSortField::Age => order_by!(users::age),
            UserSortField::Gender => order_by!(users::gender),
            UserSortField::CountryId => order_by!(users::country_id),
            UserSortField::CreatedAt => order_by!(users::created_at),
        };

        let rows = ordered
            .then_order_by(users::id.asc())
            .select(UserRow::as_select())
            .offset(offset)
            .limit(limit)
            .load::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(items, total, query.page))
    }

    async fn insert(&self, id: &UserId, draft: &UserDraft) -> Result<(), UserPersistenceError> {
        let row = NewUserRow {
            id: *id.as_uuid(),
            name: draft.name().as_str(),
            surname: draft.surname().as_str(),
            patronymic: draft.patronymic().map(PersonName::as_str),
            age: draft.age().map(age_to_db).transpose()?,
            gender: draft.gender(),
            country_id: draft.country_code(),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<u64, UserPersistenceError> {
        let changeset = UserChangeset {
            name: patch.name.as_ref().map(PersonName::as_str),
            surname: patch.surname.as_ref().map(PersonName::as_str),
            patronymic: patch.patronymic.as_ref().map(PersonName::as_str),
            age: patch.age.map(age_to_db).transpose()?,
            gender: patch.gender.as_deref(),
            country_id: patch.country_code.as_deref(),
            updated_at: Utc::now(),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(users::table.filter(users::id.eq(*id.as_uuid())))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected as u64)
    }

    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(users::table.filter(users::id.eq(*id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected as u64)
    }
}
