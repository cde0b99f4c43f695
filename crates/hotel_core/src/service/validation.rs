//! Payload validation driven by `FieldRule` tables.
//!
//! # Invariants
//! - Runs before any repository call.
//! - `id` in a body is dropped, never validated or forwarded.
//! - Unknown keys are rejected.
//! - On create, a required field that is absent, `null` or blank is missing.

use crate::model::schema::{find_rule, FieldKind, FieldRule};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Which operation a payload is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Full payload: required fields must be present.
    Create,
    /// Partial payload: only present keys are checked.
    Update,
}

/// Checks `body` against `rules` and returns its fields without `id`.
///
/// # Errors
/// Returns a human-readable message naming the offending field(s).
pub fn validate_payload(
    rules: &[FieldRule],
    body: &Value,
    mode: PayloadMode,
) -> Result<Map<String, Value>, String> {
    let Value::Object(fields) = body else {
        return Err("request body must be a JSON object".to_string());
    };

    let mut fields = fields.clone();
    fields.remove("id");

    if let Some(unknown) = fields.keys().find(|key| find_rule(rules, key).is_none()) {
        return Err(format!("unknown field `{unknown}`"));
    }

    if mode == PayloadMode::Create {
        let missing: Vec<&str> = rules
            .iter()
            .filter(|rule| rule.required && is_missing(fields.get(rule.name)))
            .map(|rule| rule.name)
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing required fields: {}", missing.join(", ")));
        }
    }

    for rule in rules {
        if let Some(value) = fields.get(rule.name) {
            check_field(rule, value)?;
        }
    }

    Ok(fields)
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

fn check_field(rule: &FieldRule, value: &Value) -> Result<(), String> {
    let name = rule.name;
    if value.is_null() {
        return if rule.nullable {
            Ok(())
        } else {
            Err(format!("`{name}` must not be null"))
        };
    }

    match rule.kind {
        FieldKind::Text => {
            let text = expect_string(name, value)?;
            if text.trim().is_empty() {
                return Err(format!("`{name}` must not be blank"));
            }
        }
        FieldKind::Integer { min } => {
            let number = value
                .as_i64()
                .ok_or_else(|| format!("`{name}` must be an integer"))?;
            if number < min {
                return Err(format!("`{name}` must be at least {min}"));
            }
        }
        FieldKind::Date => {
            let text = expect_string(name, value)?;
            if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
                return Err(format!("`{name}` must be a date formatted as YYYY-MM-DD"));
            }
        }
        FieldKind::Timestamp => {
            let text = expect_string(name, value)?;
            if DateTime::parse_from_rfc3339(text).is_err() {
                return Err(format!("`{name}` must be an RFC 3339 timestamp"));
            }
        }
        FieldKind::Enum(literals) => {
            let text = expect_string(name, value)?;
            if !literals.contains(&text) {
                return Err(format!(
                    "`{name}` must be one of {}, got `{text}`",
                    literals.join(", ")
                ));
            }
        }
    }

    Ok(())
}

fn expect_string<'a>(name: &str, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("`{name}` must be a string"))
}
