use crate::{
    context::Context,
    error::{ConfigError, RuleError},
    value::Value,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

///
/// Bound
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Bound {
    Min,
    Max,
}

impl Bound {
    const fn rule(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    // Both bounds are inclusive.
    const fn admits(self, ordering: Ordering) -> bool {
        match self {
            Self::Min => !matches!(ordering, Ordering::Less),
            Self::Max => !matches!(ordering, Ordering::Greater),
        }
    }
}

/// Length, numeric value or instant must be at least `param`.
pub fn validate_min(
    _: &Context,
    path: &str,
    value: &Value,
    param: &str,
) -> Result<bool, RuleError> {
    check(Bound::Min, path, value, param).map_err(Into::into)
}

/// Length, numeric value or instant must be at most `param`.
pub fn validate_max(
    _: &Context,
    path: &str,
    value: &Value,
    param: &str,
) -> Result<bool, RuleError> {
    check(Bound::Max, path, value, param).map_err(Into::into)
}

fn check(bound: Bound, path: &str, value: &Value, param: &str) -> Result<bool, ConfigError> {
    let rule = bound.rule();
    if param.is_empty() {
        return Err(ConfigError::MissingParam {
            rule,
            path: path.to_string(),
        });
    }

    let invalid = |reason: String| ConfigError::InvalidParam {
        rule,
        path: path.to_string(),
        param: param.to_string(),
        reason,
    };

    let ordering = match value {
        Value::Text(_) | Value::List(_) | Value::Array(_) | Value::Map(_) => {
            let limit = parse_int(param).map_err(invalid)?;
            let len = value.len().unwrap_or_default();

            // a negative bound sits below every length
            usize::try_from(limit).map_or(Ordering::Greater, |limit| len.cmp(&limit))
        }
        Value::Int(v) => v.cmp(&parse_int(param).map_err(invalid)?),
        Value::Uint(v) => v.cmp(&parse_uint(param).map_err(invalid)?),
        Value::Float(v) => {
            let limit = param
                .parse::<f64>()
                .map_err(|err| invalid(err.to_string()))?;

            match v.partial_cmp(&limit) {
                Some(ordering) => ordering,
                None => return Ok(false),
            }
        }
        Value::Timestamp(v) => v.cmp(&parse_time(param).map_err(invalid)?),
        other => {
            return Err(ConfigError::UnsupportedValue {
                rule,
                path: path.to_string(),
                found: other.label(),
            });
        }
    };

    Ok(bound.admits(ordering))
}

// ============================================================================
// Parameter parsing
// ============================================================================

// Integer literal with an optional sign, radix prefix and `_` separators.
fn parse_int(param: &str) -> Result<i64, String> {
    let (negative, digits) = match param.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, param.strip_prefix('+').unwrap_or(param)),
    };
    let magnitude = parse_uint(digits)?;

    let signed = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };

    signed.ok_or_else(|| format!("{param} is out of range for a signed integer"))
}

fn parse_uint(param: &str) -> Result<u64, String> {
    let lower = param.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, lower.as_str())
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(format!("{param} is not an integer"));
    }
    let digits = digits.replace('_', "");

    u64::from_str_radix(&digits, radix).map_err(|err| err.to_string())
}

// RFC 3339 instant, or a bare date taken as midnight UTC.
fn parse_time(param: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(param) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(param, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("{param} is not an RFC 3339 timestamp"))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_params_accept_prefixes_and_separators() {
        assert_eq!(parse_int("1_000"), Ok(1000));
        assert_eq!(parse_int("-0x10"), Ok(-16));
        assert_eq!(parse_int("0b101"), Ok(5));
        assert_eq!(parse_int("0o17"), Ok(15));
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
        assert!(parse_int("9223372036854775808").is_err());
        assert!(parse_int("_1").is_err());
        assert!(parse_int("ten").is_err());
        assert!(parse_uint("-1").is_err());
    }

    #[test]
    fn time_params_accept_rfc3339_and_dates() {
        let instant = parse_time("2024-01-02T03:04:05Z").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-02T03:04:05+00:00");

        let date = parse_time("2024-01-02").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-02T00:00:00+00:00");

        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn negative_length_bound() {
        let text = Value::from("abc");

        assert!(check(Bound::Min, "f", &text, "-1").unwrap());
        assert!(!check(Bound::Max, "f", &text, "-1").unwrap());
    }

    #[test]
    fn nan_never_satisfies_a_bound() {
        assert!(!check(Bound::Min, "f", &Value::Float(f64::NAN), "0").unwrap());
        assert!(!check(Bound::Max, "f", &Value::Float(f64::NAN), "0").unwrap());
    }
}
