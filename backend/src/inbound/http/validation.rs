//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, Rating, SwipeDirection};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn invalid_value_error(field: FieldName, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
    }))
}

pub(crate) fn parse_direction(value: &str, field: FieldName) -> Result<SwipeDirection, Error> {
    value.parse().map_err(|_| {
        invalid_value_error(
            field,
            format!("{} must be \"right\" or \"left\"", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_rating(value: i16, field: FieldName) -> Result<Rating, Error> {
    Rating::new(value).map_err(|_| {
        Error::invalid_request(format!("{} must be between 1 and 5", field.as_str())).with_details(
            json!({
                "field": field.as_str(),
                "value": value,
            }),
        )
    })
}
