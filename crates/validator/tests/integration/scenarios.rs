use pretty_assertions::assert_eq;
use serde_json::json;
use vigil_validator::prelude::*;

use crate::common::{registry, required_error, subject};

#[tokio::test]
async fn missing_required_field_is_reported() {
    let registry = registry();
    let schema = Schema::new().field("name", [Rule::validator("required")]);

    let report = Run::new(&registry, subject(json!({})), &schema)
        .execute()
        .await
        .unwrap();

    assert!(!report.is_valid());
    assert_eq!(report.field_errors("name"), Some(&[required_error()][..]));
}

#[tokio::test]
async fn string_age_is_converted_then_checked() {
    let registry = registry();
    let schema = Schema::from_json_str(
        r#"{"age": [{"sanitizer": "to_int"}, {"validator": "min", "min": 18}]}"#,
    )
    .unwrap();

    let report = Run::new(&registry, subject(json!({"age": "20"})), &schema)
        .execute()
        .await
        .unwrap();

    assert!(report.is_valid());
    assert_eq!(report.field("age"), Some(&json!(20)));
}

#[tokio::test]
async fn field_without_rules_stays_valid() {
    let registry = registry();
    let schema = Schema::new().field("nickname", []);

    let report = Run::new(&registry, subject(json!({"nickname": "ada"})), &schema)
        .execute()
        .await
        .unwrap();

    assert!(report.is_valid());
    assert_eq!(report.errors(), None);
    assert_eq!(report.field_errors("nickname"), None);
}

#[tokio::test]
async fn fields_outside_the_schema_are_untouched() {
    let registry = registry();
    let schema = Schema::new().field("name", [Rule::sanitizer("trim")]);

    let report = Run::new(
        &registry,
        subject(json!({"name": " ada ", "bio": " keep "})),
        &schema,
    )
    .execute()
    .await
    .unwrap();

    assert_eq!(
        report.into_subject(),
        subject(json!({"name": "ada", "bio": " keep "}))
    );
}

#[tokio::test]
async fn errors_accumulate_across_fields() {
    let registry = registry();
    let schema = Schema::new()
        .field("name", [Rule::validator("required")])
        .field("age", [Rule::sanitizer("to_int"), Rule::validator("min").with_option("min", 18)])
        .field("email", [Rule::validator("required")]);

    let report = Run::new(&registry, subject(json!({"age": "12"})), &schema)
        .execute()
        .await
        .unwrap();

    let errors = report.errors().unwrap();
    assert_eq!(errors.keys().collect::<Vec<_>>(), ["name", "age", "email"]);
    assert_eq!(report.status().error_count(), 3);

    let min = ValidationError::from_payload(&errors["age"][0]).unwrap();
    assert_eq!(min.code, "min");
    assert_eq!(min.param("min"), Some("18"));
}

#[tokio::test]
async fn rules_with_empty_names_are_skipped() {
    let registry = registry();
    let schema = Schema::from_json_str(
        r#"{"name": [{"sanitizer": ""}, {"validator": ""}, {"sanitizer": "trim"}]}"#,
    )
    .unwrap();

    let report = Run::new(&registry, subject(json!({"name": " ada "})), &schema)
        .execute()
        .await
        .unwrap();

    assert!(report.is_valid());
    assert_eq!(report.field("name"), Some(&json!("ada")));
}

#[tokio::test]
async fn callback_receives_the_report() {
    let registry = registry();
    let schema = Schema::new().field("name", [Rule::validator("required")]);

    let mut outcome = None;
    Run::new(&registry, subject(json!({"name": "ada"})), &schema)
        .execute_with(|result| outcome = Some(result))
        .await;

    let report = outcome.unwrap().unwrap();
    assert!(report.is_valid());
}

#[test]
fn blocking_execution_without_async_validators() {
    let registry = registry();
    let schema = Schema::new().field("name", [Rule::sanitizer("uppercase")]);

    let report = Run::new(&registry, subject(json!({"name": "ada"})), &schema)
        .execute_blocking()
        .unwrap();

    assert_eq!(report.field("name"), Some(&json!("ADA")));
}

#[test]
fn report_serializes_subject_and_status() {
    let registry = registry();
    let schema = Schema::new().field("name", [Rule::validator("required")]);

    let report = Run::new(&registry, subject(json!({})), &schema)
        .execute_blocking()
        .unwrap();

    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "subject": {},
            "status": {"errors": {"name": [required_error()]}, "valid": false}
        })
    );
}
