use chrono::{DateTime, TimeZone, Utc};
use docvault::prelude::*;
use std::sync::Arc;

#[derive(Clone, Debug, Default, Record)]
struct Person {
    #[vault("Name,required,min=3")]
    name: String,
    #[vault("Age,min=18")]
    age: u8,
    #[vault("Email,required,email")]
    email: String,
    #[vault("joined,omitempty,min=2020-01-01T00:00:00Z")]
    joined: DateTime<Utc>,
    #[vault("nickname,omitempty_update")]
    nickname: Option<String>,
    notes: String,
}

fn person(name: &str, email: &str) -> Person {
    Person {
        name: name.to_string(),
        age: 30,
        email: email.to_string(),
        ..Person::default()
    }
}

fn create_opts(validator: &Validator) -> docvault::options::ValidationOpts {
    validator.resolve(Method::Create, &Options::new())
}

#[test]
fn short_name_fails_min() {
    let validator = Validator::new();
    let mut record = person("Jo", "john@x.com");

    let err = validator
        .validate(&Context::background(), &mut record, &create_opts(&validator))
        .unwrap_err();
    let field = err.as_field_error().unwrap();

    assert_eq!(field.code(), ErrorCode::FailedValidation);
    assert_eq!(field.tag(), "min");
    assert_eq!(field.field(), "Name");
    assert_eq!(field.struct_field(), "name");
}

#[test]
fn malformed_email_fails_email() {
    let validator = Validator::new();
    let mut record = person("John Doe", "not-an-email");

    let err = validator
        .validate(&Context::background(), &mut record, &create_opts(&validator))
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::FailedValidation));
    assert_eq!(err.as_field_error().unwrap().tag(), "email");
}

#[test]
fn empty_registration_name_is_rejected() {
    let mut validator = Validator::new();

    let err = validator
        .register_validation("", |_, _, _, _| Ok(true))
        .unwrap_err();

    assert!(matches!(err, Error::Registration(_)));
    assert!(validator.registry().validation("").is_none());
}

#[test]
fn untagged_and_omitted_fields_stay_out() {
    let validator = Validator::new();
    let mut record = person("John Doe", "john@x.com");
    record.notes = "private".to_string();

    let doc = validator
        .validate(&Context::background(), &mut record, &create_opts(&validator))
        .unwrap();

    let mut keys: Vec<_> = doc.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["Age", "Email", "Name", "nickname"]);
    assert_eq!(doc.get("nickname"), Some(&Value::Null));
}

#[test]
fn timestamps_are_bounded_chronologically() {
    let validator = Validator::new();
    let ctx = Context::background();

    let mut record = person("John Doe", "john@x.com");
    record.joined = Utc.with_ymd_and_hms(2019, 12, 31, 0, 0, 0).unwrap();
    let err = validator
        .validate(&ctx, &mut record, &create_opts(&validator))
        .unwrap_err();
    assert_eq!(err.as_field_error().unwrap().field(), "joined");

    record.joined = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
    let doc = validator
        .validate(&ctx, &mut record, &create_opts(&validator))
        .unwrap();
    assert_eq!(doc.get("joined"), Some(&Value::Timestamp(record.joined)));
}

#[test]
fn config_changes_method_defaults() {
    let config = Config::from_toml_str(
        r#"
        [update]
        skip_required = false
        "#,
    )
    .unwrap();
    let validator = Validator::with_config(config);
    let mut record = person("John Doe", "");

    let err = validator
        .validate_with(&Context::background(), &mut record, Method::Update, &Options::new())
        .unwrap_err();
    assert_eq!(err.as_field_error().unwrap().tag(), "required");

    // per-call options still win
    let opts = Options::new().skip_required();
    assert!(validator
        .validate_with(&Context::background(), &mut record, Method::Update, &opts)
        .is_ok());
}

#[test]
fn shared_validator_serves_threads() {
    let validator = Arc::new(Validator::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = Arc::clone(&validator);
            std::thread::spawn(move || {
                let mut record = person(&format!("user {i}"), "u@example.com");
                let opts = validator.resolve(Method::Create, &Options::new());
                validator
                    .validate(&Context::background(), &mut record, &opts)
                    .map(|doc| doc.get("Name").cloned())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let name = handle.join().unwrap().unwrap();
        assert_eq!(name, Some(Value::from(format!("user {i}"))));
    }
}
