//! Tests for field-level validation error extraction.

mod common;

use common::{api, legacy};
use ott_errors::error::{ClientError, ErrorCode};
use ott_errors::format::{
    extract_field_errors, format_field_error, is_validation_error, FieldErrorsMap,
    NON_FIELD_ERRORS,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn fields(pairs: &[(&str, &[&str])]) -> FieldErrorsMap {
    pairs
        .iter()
        .map(|(key, msgs)| (key.to_string(), msgs.iter().map(|m| m.to_string()).collect()))
        .collect()
}

#[test]
fn body_scoped_location_maps_to_field() {
    let err = api(
        422,
        None,
        Some(json!({"errors": [{"loc": ["body", "email"], "msg": "Invalid"}]})),
    );
    assert_eq!(extract_field_errors(&err), fields(&[("email", &["Invalid"])]));
}

#[test]
fn list_form_covers_nested_paths_strings_and_defaults() {
    let err = api(
        422,
        Some(ErrorCode::ValidationError),
        Some(json!({"errors": [
            {"loc": ["body", "address", "city"], "msg": "Required"},
            {"loc": ["query", "items", 2, "sku"], "msg": "Unknown SKU"},
            {"loc": ["__root__"], "msg": "Passwords do not match"},
            {"loc": ["path", "title_id"]},
            "Account is locked",
            {"msg": "Try again"},
            42,
            null,
            {},
            {"foo": 1},
            {"loc": "email"},
            {"loc": ["body", "address", "city"], "msg": "Too short"},
        ]})),
    );
    assert_eq!(
        extract_field_errors(&err),
        fields(&[
            ("address.city", &["Required", "Too short"]),
            ("items[2].sku", &["Unknown SKU"]),
            ("title_id", &["Invalid value."]),
            (
                NON_FIELD_ERRORS,
                &["Passwords do not match", "Account is locked", "Try again"]
            ),
        ])
    );
}

#[test]
fn list_items_without_message_or_path_are_skipped() {
    let err = api(
        422,
        None,
        Some(json!({"errors": [{}, {"foo": 1}, {"loc": "email"}, {"msg": null}]})),
    );
    assert_eq!(extract_field_errors(&err), FieldErrorsMap::new());
    assert!(is_validation_error(&err));
}

#[test]
fn map_form_accepts_strings_lists_and_objects() {
    let err = api(
        400,
        None,
        Some(json!({"errors": {
            "name": "Required",
            "tags": ["Too many", {"msg": "Duplicate"}, {"code": "x"}],
            "age": {"msg": 18},
            "empty": [],
            "blank": "  ",
            "missing": null,
        }})),
    );
    assert_eq!(
        extract_field_errors(&err),
        fields(&[
            ("age", &["18"]),
            ("name", &["Required"]),
            ("tags", &["Too many", "Duplicate"]),
        ])
    );
}

#[test]
fn returned_lists_are_never_empty() {
    let err = api(
        400,
        None,
        Some(json!({"errors": {"a": [], "b": [null], "c": {"msg": ""}}})),
    );
    let map = extract_field_errors(&err);
    assert!(map.is_empty());
    assert!(map.values().all(|msgs| !msgs.is_empty()));
}

#[test]
fn non_structured_errors_have_no_fields() {
    assert!(extract_field_errors(&ClientError::network("offline")).is_empty());
    assert!(extract_field_errors(&ClientError::generic("boom")).is_empty());
    assert!(extract_field_errors(&api(422, None, None)).is_empty());
    assert!(extract_field_errors(&api(422, None, Some(json!({"detail": "x"})))).is_empty());
}

#[test]
fn legacy_bodies_are_read_too() {
    let err = legacy(
        422,
        &[],
        Some(json!({"errors": [{"loc": ["body", "email"], "msg": "Taken"}]})),
    );
    assert_eq!(format_field_error("email", &err).as_deref(), Some("Taken"));
}

#[test]
fn validation_error_detection() {
    assert!(is_validation_error(&api(422, None, None)));
    assert!(is_validation_error(&api(
        400,
        None,
        Some(json!({"errors": ["bad"]}))
    )));
    assert!(is_validation_error(&api(
        400,
        None,
        Some(json!({"errors": {"name": "Required"}}))
    )));
    assert!(!is_validation_error(&api(400, None, Some(json!({"errors": []})))));
    assert!(!is_validation_error(&api(400, None, Some(json!({"errors": null})))));
    assert!(!is_validation_error(&ClientError::network("offline")));
}

#[test]
fn first_field_message() {
    let err = api(
        422,
        None,
        Some(json!({"errors": [
            {"loc": ["body", "password"], "msg": "Too short"},
            {"loc": ["body", "password"], "msg": "Needs a digit"},
        ]})),
    );
    assert_eq!(format_field_error("password", &err).as_deref(), Some("Too short"));
    assert_eq!(format_field_error("email", &err), None);
}
