//! Filtering, ordering and paging for user listings.

use std::fmt;
use std::str::FromStr;

use pagination::PageRequest;

/// Exact-match filters applied to both the page and the total count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub country_code: Option<String>,
}

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSortField {
    Id,
    Name,
    Surname,
    Patronymic,
    Age,
    Gender,
    CountryId,
    #[default]
    CreatedAt,
}

impl UserSortField {
    /// Every accepted field, in wire form.
    pub const ALL: [&'static str; 8] = [
        "id",
        "name",
        "surname",
        "patronymic",
        "age",
        "gender",
        "country_id",
        "created_at",
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Patronymic => "patronymic",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::CountryId => "country_id",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Raised when a sort field or direction is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported value `{value}`")]
pub struct UnknownOrdering {
    pub value: String,
}

impl FromStr for UserSortField {
    type Err = UnknownOrdering;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "surname" => Ok(Self::Surname),
            "patronymic" => Ok(Self::Patronymic),
            "age" => Ok(Self::Age),
            "gender" => Ok(Self::Gender),
            "country_id" => Ok(Self::CountryId),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(UnknownOrdering {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for UserSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = UnknownOrdering;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(UnknownOrdering {
                value: s.to_owned(),
            })
        }
    }
}

/// Sort order for a listing. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserOrdering {
    pub field: UserSortField,
    pub direction: SortDirection,
}

/// A complete listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub filter: UserFilter,
    pub ordering: UserOrdering,
    pub page: PageRequest,
}
