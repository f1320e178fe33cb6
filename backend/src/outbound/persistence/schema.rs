//! Diesel table definitions.
//!
//! Hand-maintained to match `backend/migrations`.

diesel::table! {
    /// Directory of users with their enrichment results.
    users (id) {
        id -> Uuid,
        name -> Text,
        surname -> Text,
        patronymic -> Nullable<Text>,
        /// Predicted age in years.
        age -> Nullable<Int4>,
        gender -> Nullable<Text>,
        /// ISO 3166-1 alpha-2 code of the predicted nationality.
        country_id -> Nullable<Text>,
        created_at -> Timestamptz,
        /// Bumped by every update.
        updated_at -> Timestamptz,
    }
}
