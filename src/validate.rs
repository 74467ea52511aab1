//! Pure validation helpers used by resource wrappers before any network
//! call is made. Each function identifies the offending field and the
//! violated constraint; none of them performs I/O.

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value as Json};

use crate::error::ValidationError;

/// Default maximum length for Cloudflare identifiers (32-character hex ids).
pub const DEFAULT_MAX_LENGTH: usize = 32;

/// JSON value kinds accepted by [`type_check`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "a boolean",
            Self::Number => "a number",
            Self::String => "a string",
            Self::Array => "an array",
            Self::Object => "an object",
        }
    }

    fn matches(self, value: &Json) -> bool {
        match self {
            Self::Null => value.is_null(),
            Self::Bool => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// Unwraps a required value, failing when it is absent.
pub fn required<T>(name: &str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingArgument {
        field: name.to_owned(),
    })
}

/// Checks membership in a fixed allowed set.
///
/// The failure message enumerates the allowed set verbatim, comma-separated.
pub fn one_of(name: &str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: name.to_owned(),
            allowed: allowed.join(", "),
        })
    }
}

/// Checks that a sequence has at least one element.
pub fn non_empty_array<T>(name: &str, value: &[T]) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::InvalidType {
            field: name.to_owned(),
            expected: "a non-empty array".to_owned(),
        })
    } else {
        Ok(())
    }
}

/// Checks that a JSON object has at least one entry.
pub fn non_empty_map(name: &str, value: &Map<String, Json>) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::InvalidType {
            field: name.to_owned(),
            expected: "a non-empty object".to_owned(),
        })
    } else {
        Ok(())
    }
}

/// Checks a JSON value against an expected kind.
pub fn type_check(name: &str, value: &Json, expected: JsonKind) -> Result<(), ValidationError> {
    if expected.matches(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidType {
            field: name.to_owned(),
            expected: expected.expected().to_owned(),
        })
    }
}

/// Checks a string against a maximum character length.
pub fn max_length(name: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(ValidationError::InvalidLength {
            field: name.to_owned(),
            max,
        })
    } else {
        Ok(())
    }
}

/// Checks a value against an optionally open-ended range.
pub fn range_check<T: PartialOrd + Display>(
    name: &str,
    value: T,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), ValidationError> {
    let below = min.as_ref().is_some_and(|min| value < *min);
    let above = max.as_ref().is_some_and(|max| value > *max);
    if !below && !above {
        return Ok(());
    }
    let constraint = match (min, max) {
        (Some(min), Some(max)) => format!("between {min} and {max}"),
        (Some(min), None) => format!("at least {min}"),
        (None, Some(max)) => format!("at most {max}"),
        (None, None) => return Ok(()),
    };
    Err(ValidationError::OutOfRange {
        field: name.to_owned(),
        constraint,
    })
}

/// Checks a Unix-epoch timestamp in seconds.
pub fn timestamp_unix(name: &str, value: i64) -> Result<(), ValidationError> {
    if value >= 0 && DateTime::from_timestamp(value, 0).is_some() {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimestamp {
            field: name.to_owned(),
            format: "Unix epoch".to_owned(),
        })
    }
}

/// Checks an ISO-8601 timestamp string.
///
/// Accepts offset-carrying timestamps as well as the bare
/// `YYYY-MM-DDTHH:MM:SS` form.
pub fn timestamp_iso8601(name: &str, value: &str) -> Result<(), ValidationError> {
    let parses = DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok();
    if parses {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimestamp {
            field: name.to_owned(),
            format: "ISO-8601".to_owned(),
        })
    }
}

/// Checks an RFC 3339 timestamp string.
pub fn timestamp_rfc3339(name: &str, value: &str) -> Result<(), ValidationError> {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimestamp {
            field: name.to_owned(),
            format: "RFC 3339".to_owned(),
        })
    }
}
