//! Domain primitives, services and ports.
//!
//! Purpose: define the user directory model and the enrichment workflow
//! independently of HTTP, SQL or the remote prediction services. Adapters in
//! `inbound` and `outbound` depend on this module, never the other way round.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserDraft, UserPatch, UserId, PersonName: the user model.
//! - UserQuery and friends: listing filters, ordering and paging.
//! - EnrichmentCoordinator: concurrent age/gender/nationality enrichment.
//! - UserService: implementation of the user driving ports.

pub mod enrichment_coordinator;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_query;
pub mod user_service;

pub use self::enrichment_coordinator::EnrichmentCoordinator;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    MAX_AGE, NameField, PersonName, User, UserDraft, UserId, UserPatch, UserValidationError,
    check_age,
};
pub use self::user_query::{
    SortDirection, UnknownOrdering, UserFilter, UserOrdering, UserQuery, UserSortField,
};
pub use self::user_service::UserService;
