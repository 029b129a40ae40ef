use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use vigil_validator::prelude::*;

use crate::common::{Spy, registry, required_error, subject};

#[tokio::test]
async fn sanitizers_run_before_validators() {
    let registry = registry();
    let schema = Schema::new().field(
        "code",
        [Rule::validator("is_uppercase"), Rule::sanitizer("uppercase")],
    );

    let report = Run::new(&registry, subject(json!({"code": "abc"})), &schema)
        .execute()
        .await
        .unwrap();

    assert!(report.is_valid());
    assert_eq!(report.field("code"), Some(&json!("ABC")));
}

#[tokio::test]
async fn sanitizers_apply_in_list_order() {
    let registry = registry();
    let schema = Schema::new().field("n", [Rule::sanitizer("add_one"), Rule::sanitizer("double")]);

    let report = Run::new(&registry, subject(json!({"n": 5})), &schema)
        .execute()
        .await
        .unwrap();

    assert_eq!(report.field("n"), Some(&json!(12)));
}

#[tokio::test]
async fn absent_fields_are_not_sanitized() {
    let spy = Spy::default();
    let registry = registry().with_sanitizer("spy", spy.sanitizer());
    let schema = Schema::new().field("missing", [Rule::sanitizer("spy")]);

    let report = Run::new(&registry, subject(json!({})), &schema)
        .execute()
        .await
        .unwrap();

    assert_eq!(spy.calls(), 0);
    assert_eq!(report.field("missing"), None);
}

#[tokio::test]
async fn null_is_a_present_value() {
    let spy = Spy::default();
    let registry = registry().with_sanitizer("spy", spy.sanitizer());
    let schema = Schema::new().field("maybe", [Rule::sanitizer("spy")]);

    Run::new(&registry, subject(json!({"maybe": null})), &schema)
        .execute()
        .await
        .unwrap();

    assert_eq!(spy.calls(), 1);
}

#[tokio::test]
async fn unknown_sanitizer_aborts_before_any_validator() {
    let spy = Spy::default();
    let registry = registry().with_validator("spy", spy.validator());
    let schema = Schema::new()
        .field("name", [Rule::validator("spy")])
        .field("age", [Rule::sanitizer("no_such_sanitizer")]);

    let err = Run::new(&registry, subject(json!({"name": "ada", "age": 1})), &schema)
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        RunError::Unresolved { kind: RuleKind::Sanitizer, field, name, .. }
            if field == "age" && name == "no_such_sanitizer"
    ));
    assert_eq!(err.to_string(), "invalid sanitizer no_such_sanitizer");
    assert!(err.status().is_none());
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn unknown_sanitizer_stops_later_sanitizers() {
    let spy = Spy::default();
    let registry = registry().with_sanitizer("spy", spy.sanitizer());
    let schema = Schema::new()
        .field("a", [Rule::sanitizer("spy")])
        .field("b", [Rule::sanitizer("no_such_sanitizer"), Rule::sanitizer("spy")])
        .field("c", [Rule::sanitizer("spy")]);

    let result = Run::new(&registry, subject(json!({"a": 1, "b": 2, "c": 3})), &schema)
        .execute()
        .await;

    assert!(result.is_err_and(|err| err.is_resolution()));
    assert_eq!(spy.calls(), 1);
}

#[tokio::test]
async fn unknown_sanitizer_on_absent_field_goes_unnoticed() {
    let registry = registry();
    let schema = Schema::new().field("missing", [Rule::sanitizer("no_such_sanitizer")]);

    let report = Run::new(&registry, subject(json!({})), &schema)
        .execute()
        .await
        .unwrap();

    assert!(report.is_valid());
}

#[tokio::test]
async fn sanitizers_see_earlier_fields_already_sanitized() {
    let registry = registry().with_sanitizer(
        "prefix_with_name",
        |ctx: &RunContext<'_>, _: &Rule, value: &Value| {
            let name = ctx.field("name").and_then(Value::as_str).unwrap_or_default();
            Value::from(format!("{name}:{}", value.as_str().unwrap_or_default()))
        },
    );
    let schema = Schema::new()
        .field("name", [Rule::sanitizer("trim")])
        .field("handle", [Rule::sanitizer("prefix_with_name")]);

    let report = Run::new(
        &registry,
        subject(json!({"name": "  ada  ", "handle": "x1"})),
        &schema,
    )
    .execute()
    .await
    .unwrap();

    assert_eq!(report.field("handle"), Some(&json!("ada:x1")));
}

#[tokio::test]
async fn rule_options_reach_the_sanitizer() {
    let registry = registry().with_sanitizer(
        "truncate",
        |_: &RunContext<'_>, rule: &Rule, value: &Value| {
            let len = rule.option_as::<usize>("len").unwrap_or(usize::MAX);
            value.as_str().map_or_else(
                || value.clone(),
                |s| Value::from(s.chars().take(len).collect::<String>()),
            )
        },
    );
    let schema = Schema::new().field("title", [Rule::sanitizer("truncate").with_option("len", 3)]);

    let report = Run::new(&registry, subject(json!({"title": "validation"})), &schema)
        .execute()
        .await
        .unwrap();

    assert_eq!(report.field("title"), Some(&json!("val")));
}

#[tokio::test]
async fn unknown_sanitizer_hands_back_the_partly_sanitized_subject() {
    let registry = registry();
    let schema = Schema::new()
        .field("name", [Rule::sanitizer("trim")])
        .field("age", [Rule::sanitizer("no_such_sanitizer")]);

    let err = Run::new(&registry, subject(json!({"name": " ada ", "age": "7"})), &schema)
        .execute()
        .await
        .unwrap_err();

    assert_eq!(err.subject().get("name"), Some(&json!("ada")));
    assert_eq!(err.into_subject(), subject(json!({"name": "ada", "age": "7"})));
}

#[tokio::test]
async fn sanitizer_can_remove_a_field() {
    let spy = Spy::default();
    let registry = registry()
        .with_removing_sanitizer(
            "blank_to_absent",
            |_: &RunContext<'_>, _: &Rule, value: &Value| {
                (value.as_str() != Some("")).then(|| value.clone())
            },
        )
        .with_sanitizer("spy", spy.sanitizer());
    let schema = Schema::new().field(
        "nickname",
        [
            Rule::sanitizer("blank_to_absent"),
            Rule::sanitizer("spy"),
            Rule::validator("required"),
        ],
    );

    let report = Run::new(
        &registry,
        subject(json!({"first": 1, "nickname": "", "last": 2})),
        &schema,
    )
    .execute()
    .await
    .unwrap();

    assert_eq!(spy.calls(), 0);
    assert_eq!(report.field("nickname"), None);
    assert_eq!(report.field_errors("nickname").unwrap(), [required_error()]);
    assert_eq!(report.into_subject(), subject(json!({"first": 1, "last": 2})));
}

#[tokio::test]
async fn removing_sanitizer_keeps_other_values() {
    let registry = registry().with_removing_sanitizer(
        "blank_to_absent",
        |_: &RunContext<'_>, _: &Rule, value: &Value| {
            (value.as_str() != Some("")).then(|| value.clone())
        },
    );
    let schema = Schema::new().field("nickname", [Rule::sanitizer("blank_to_absent")]);

    let report = Run::new(&registry, subject(json!({"nickname": "ada"})), &schema)
        .execute()
        .await
        .unwrap();

    assert_eq!(report.field("nickname"), Some(&json!("ada")));
}
