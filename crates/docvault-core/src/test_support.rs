//! Shared fixtures for unit tests.

use crate::{context::Context, error::RuleError, validator::Validator, value::Value};
use chrono::{DateTime, Utc};
use docvault_derive::Record;

#[derive(Clone, Debug, Default, PartialEq, Record)]
pub(crate) struct Address {
    #[vault(",required")]
    pub street: String,
    #[vault(",required")]
    pub city: String,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
pub(crate) struct Profile {
    #[vault("name,required,min=3,max=50")]
    pub name: String,
    #[vault("age,min=18,max=120")]
    pub age: i32,
    #[vault("email,required,email")]
    pub email: String,
    #[vault("created_at,omitempty")]
    pub created_at: DateTime<Utc>,
    #[vault("address")]
    pub address: Address,
    #[vault("tags,min=1,max=5")]
    pub tags: Vec<String>,
}

impl Profile {
    pub(crate) fn valid() -> Self {
        Self {
            name: "John Doe".to_string(),
            age: 30,
            email: "john@example.com".to_string(),
            created_at: DateTime::default(),
            address: Address {
                street: "123 Main St".to_string(),
                city: "Anytown".to_string(),
            },
            tags: vec!["tag1".to_string(), "tag2".to_string()],
        }
    }
}

/// Validator with a `custom` rule (value must be "custom") and an
/// `uppercase` transformation.
pub(crate) fn custom_validator() -> Validator {
    let mut validator = Validator::new();

    validator
        .register_validation("custom", |_, _, value, _| {
            Ok(value.as_text() == Some("custom"))
        })
        .unwrap();
    validator
        .register_transformation("uppercase", uppercase)
        .unwrap();

    validator
}

pub(crate) fn uppercase(_: &Context, _: &str, value: &Value) -> Result<Option<Value>, RuleError> {
    Ok(value.as_text().map(|text| Value::from(text.to_uppercase())))
}
