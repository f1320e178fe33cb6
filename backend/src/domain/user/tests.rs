//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn name(value: &str) -> PersonName {
    PersonName::new(value, NameField::Name).expect("fixture names are valid")
}

#[fixture]
fn ivan_draft() -> UserDraft {
    UserDraft::new(name("Ivan"), name("Petrov"), None)
}

#[rstest]
fn user_id_accepts_valid_uuid() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.as_ref(), VALID_ID);
    assert_eq!(id.as_uuid().to_string(), VALID_ID);
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn random_ids_are_distinct_v4_uuids() {
    let first = UserId::random();
    let second = UserId::random();
    assert_ne!(first, second);
    assert_eq!(first.as_uuid().get_version_num(), 4);
}

#[rstest]
fn person_name_is_trimmed() {
    assert_eq!(name("  Ivan \t").as_str(), "Ivan");
}

#[rstest]
#[case(NameField::Name, "name is empty")]
#[case(NameField::Surname, "surname is empty")]
fn blank_person_name_reports_field(#[case] field: NameField, #[case] message: &str) {
    let err = PersonName::new("   ", field).expect_err("blank names are rejected");
    assert_eq!(err, UserValidationError::EmptyName { field });
    assert_eq!(err.to_string(), message);
}

#[rstest]
fn optional_name_drops_blank_values() {
    assert_eq!(PersonName::optional(Some("  ")), None);
    assert_eq!(PersonName::optional(None::<&str>), None);
    assert_eq!(
        PersonName::optional(Some(" Ivanovich ")).map(String::from),
        Some("Ivanovich".to_owned())
    );
}

#[rstest]
fn new_draft_has_no_predictions(ivan_draft: UserDraft) {
    assert_eq!(ivan_draft.age(), None);
    assert_eq!(ivan_draft.gender(), None);
    assert_eq!(ivan_draft.country_code(), None);
}

#[rstest]
fn setters_fill_single_fields(mut ivan_draft: UserDraft) {
    ivan_draft.set_gender("male");
    assert_eq!(ivan_draft.gender(), Some("male"));
    assert_eq!(ivan_draft.age(), None);
    assert_eq!(ivan_draft.country_code(), None);
}

#[rstest]
fn user_serialises_with_camel_case_and_omits_missing_fields(mut ivan_draft: UserDraft) {
    ivan_draft.set_age(30);
    ivan_draft.set_country_code("RU");
    let created_at = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
        .expect("valid timestamp")
        .with_timezone(&Utc);
    let user = User::from_draft(UserId::new(VALID_ID).expect("valid id"), ivan_draft, created_at);

    let value = serde_json::to_value(&user).expect("user serialises");
    assert_eq!(
        value,
        json!({
            "id": VALID_ID,
            "name": "Ivan",
            "surname": "Petrov",
            "age": 30,
            "countryId": "RU",
            "createdAt": "2024-01-02T03:04:05Z",
        })
    );
}

#[rstest]
fn apply_patch_only_touches_present_fields(ivan_draft: UserDraft) {
    let mut user = User::from_draft(UserId::random(), ivan_draft, Utc::now());
    let patch = UserPatch {
        surname: Some(name("Sidorov")),
        age: Some(41),
        ..UserPatch::default()
    };

    user.apply(&patch);

    assert_eq!(user.name().as_str(), "Ivan");
    assert_eq!(user.surname().as_str(), "Sidorov");
    assert_eq!(user.age(), Some(41));
    assert_eq!(user.gender(), None);
}

#[rstest]
fn empty_patch_is_rejected() {
    let patch = UserPatch::default();
    assert!(patch.is_empty());
    assert_eq!(patch.ensure_not_empty(), Err(UserValidationError::EmptyPatch));
    assert_eq!(
        UserValidationError::EmptyPatch.to_string(),
        "no fields provided for update"
    );
}

#[rstest]
fn patch_with_any_field_is_accepted() {
    let patch = UserPatch {
        gender: Some("female".to_owned()),
        ..UserPatch::default()
    };
    assert!(patch.ensure_not_empty().is_ok());
}

#[rstest]
#[case(0, true)]
#[case(MAX_AGE, true)]
#[case(MAX_AGE + 1, false)]
#[case(u32::MAX, false)]
fn ages_are_bounded_by_storage(#[case] age: u32, #[case] storable: bool) {
    let checked = check_age(age);
    if storable {
        assert_eq!(checked, Ok(age));
    } else {
        assert_eq!(checked, Err(UserValidationError::AgeOutOfRange { age }));
    }
}
