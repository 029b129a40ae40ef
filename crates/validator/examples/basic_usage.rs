//! Basic usage example for vigil-validator
//!
//! Run with `RUST_LOG=vigil_validator=trace` to see every rule being applied.

use std::time::Duration;

use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use vigil_validator::prelude::*;

const SCHEMA: &str = r#"{
    "name":  [{"sanitizer": "trim"}, {"validator": "required"}],
    "age":   [{"sanitizer": "to_int"}, {"validator": "min", "min": 18}],
    "email": [
        {"validator": "required"},
        {"validator": "unique_email", "groups": "signup"}
    ]
}"#;

fn registry() -> Registry {
    Registry::new()
        .with_sanitizer("trim", |_: &RunContext<'_>, _: &Rule, v: &Value| {
            v.as_str().map_or_else(|| v.clone(), |s| Value::from(s.trim()))
        })
        .with_sanitizer("to_int", |_: &RunContext<'_>, _: &Rule, v: &Value| {
            v.as_str()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .map_or_else(|| v.clone(), Value::from)
        })
        .with_validator("required", |_: &RunContext<'_>, _: &Rule, v: Option<&Value>| {
            v.is_none().then(|| ValidationError::required().into_payload())
        })
        .with_validator("min", |_: &RunContext<'_>, rule: &Rule, v: Option<&Value>| {
            let min = rule.option_as::<i64>("min")?;
            match v.and_then(Value::as_i64) {
                Some(n) if n >= min => None,
                _ => Some(
                    ValidationError::new("min", format!("Must be at least {min}"))
                        .with_param("min", min.to_string())
                        .into_payload(),
                ),
            }
        })
        .with_async_validator(
            "unique_email",
            |_: &RunContext<'_>, _: &Rule, v: Option<&Value>| {
                let email = v.and_then(Value::as_str).map(str::to_owned);
                async move {
                    // Stand-in for a database lookup.
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    let taken = email.as_deref() == Some("ada@example.com");
                    AsyncVerdict::Ok(taken.then(|| {
                        ValidationError::new("unique", "Email is already registered").into_payload()
                    }))
                }
            },
        )
}

fn print_report(label: &str, result: Result<Report, RunError>) {
    match result {
        Ok(report) if report.is_valid() => {
            println!("{label}: valid, subject = {}", Value::from(report.into_subject()));
        }
        Ok(report) => {
            println!("{label}: invalid");
            for (field, errors) in report.errors().into_iter().flatten() {
                for error in errors {
                    println!("  {field}: {error}");
                }
            }
        }
        Err(err) => println!("{label}: aborted: {err}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = registry();
    let schema = Schema::from_json_str(SCHEMA)?;

    let subject = |value: Value| match value {
        Value::Object(map) => map,
        _ => Subject::new(),
    };

    let profile = Run::new(
        &registry,
        subject(json!({"name": "  Ada  ", "age": "36", "email": "ada@example.com"})),
        &schema,
    );
    print_report("profile update", profile.execute().await);

    let signup = Run::new(
        &registry,
        subject(json!({"name": "Grace", "age": "12", "email": "ada@example.com"})),
        &schema,
    )
    .with_groups("signup");
    print_report("signup", signup.execute().await);

    let broken = Schema::new().field("name", [Rule::sanitizer("slugify")]);
    let run = Run::new(&registry, subject(json!({"name": "Ada"})), &broken);
    print_report("misconfigured", run.execute().await);

    Ok(())
}
