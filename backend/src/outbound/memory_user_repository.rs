//! Process-local `UserRepository` for runs without a database.
//!
//! Mirrors the PostgreSQL adapter's listing semantics: exact-match filters,
//! `NULL`s sort last ascending and first descending, ties break on id.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use pagination::Page;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    SortDirection, User, UserDraft, UserFilter, UserId, UserPatch, UserQuery, UserSortField,
};

/// Users held in a mutex-guarded map. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> MutexGuard<'_, HashMap<Uuid, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches(user: &User, filter: &UserFilter) -> bool {
    fn same(expected: Option<&String>, actual: Option<&str>) -> bool {
        expected.is_none_or(|value| actual == Some(value.as_str()))
    }

    same(filter.name.as_ref(), Some(user.name().as_str()))
        && same(filter.surname.as_ref(), Some(user.surname().as_str()))
        && same(
            filter.patronymic.as_ref(),
            user.patronymic().map(|name| name.as_str()),
        )
        && filter.age.is_none_or(|age| user.age() == Some(age))
        && same(filter.gender.as_ref(), user.gender())
        && same(filter.country_code.as_ref(), user.country_code())
}

/// Ascending comparison with `None` after every value.
fn nulls_last<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(left: &User, right: &User, field: UserSortField) -> Ordering {
    match field {
        UserSortField::Id => left.id().as_uuid().cmp(right.id().as_uuid()),
        UserSortField::Name => left.name().as_str().cmp(right.name().as_str()),
        UserSortField::Surname => left.surname().as_str().cmp(right.surname().as_str()),
        UserSortField::Patronymic => nulls_last(
            left.patronymic().map(|name| name.as_str()),
            right.patronymic().map(|name| name.as_str()),
        ),
        UserSortField::Age => nulls_last(left.age(), right.age()),
        UserSortField::Gender => nulls_last(left.gender(), right.gender()),
        UserSortField::CountryId => nulls_last(left.country_code(), right.country_code()),
        UserSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find(&self, query: &UserQuery) -> Result<Page<User>, UserPersistenceError> {
        let mut selected = self
            .users()
            .values()
            .filter(|user| matches(user, &query.filter))
            .cloned()
            .collect::<Vec<_>>();

        let ordering = query.ordering;
        selected.sort_by(|left, right| {
            let primary = compare(left, right, ordering.field);
            let primary = match ordering.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| left.id().as_uuid().cmp(right.id().as_uuid()))
        });

        let total = selected.len() as u64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        let items = selected.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total, query.page))
    }

    async fn insert(&self, id: &UserId, draft: &UserDraft) -> Result<(), UserPersistenceError> {
        let mut users = self.users();
        if users.contains_key(id.as_uuid()) {
            return Err(UserPersistenceError::query(format!(
                "user {id} already exists"
            )));
        }
        let user = User::from_draft(id.clone(), draft.clone(), Utc::now());
        users.insert(*id.as_uuid(), user);
        Ok(())
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<u64, UserPersistenceError> {
        Ok(self
            .users()
            .get_mut(id.as_uuid())
            .map_or(0, |user| {
                user.apply(patch);
                1
            }))
    }

    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError> {
        Ok(u64::from(self.users().remove(id.as_uuid()).is_some()))
    }
}
