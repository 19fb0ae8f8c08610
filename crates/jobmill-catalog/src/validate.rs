use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::types::{FieldSpec, FieldType};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate `payload` against a task's declared schema.
///
/// Returns a field-name → error-message map; an empty map means the
/// payload is valid. Messages are stable tokens (`required`,
/// `invalid(min)`, `invalid(email)`, …) so callers can pattern-match or
/// surface them verbatim.
///
/// The schema is permissive of additional data and strict on declared
/// fields: unknown payload keys are silently ignored, missing required
/// keys (or explicit nulls) fail, and absent optional fields are skipped.
/// Coercion failures are captured into the map, never propagated.
pub fn validate_inputs(schema: &[FieldSpec], payload: &Value) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    let empty = serde_json::Map::new();
    // A non-object payload carries no fields, so every required field fails.
    let object = payload.as_object().unwrap_or(&empty);

    for field in schema {
        let value = object.get(&field.name).filter(|v| !v.is_null());

        let Some(value) = value else {
            if field.required {
                errors.insert(field.name.clone(), "required".to_string());
            }
            continue;
        };

        if let Err(reason) = check_value(field, value) {
            errors.insert(field.name.clone(), format!("invalid({reason})"));
        }
    }
    errors
}

fn check_value(field: &FieldSpec, value: &Value) -> Result<(), String> {
    match field.field_type {
        FieldType::Int => {
            let number = coerce_int(value)?;
            if let Some(min) = field.min {
                if number < min {
                    return Err("min".to_string());
                }
            }
            if let Some(max) = field.max {
                if number > max {
                    return Err("max".to_string());
                }
            }
            Ok(())
        }
        FieldType::Email => {
            let text = value.as_str().ok_or_else(|| "email".to_string())?;
            if is_email(text) {
                Ok(())
            } else {
                Err("email".to_string())
            }
        }
        FieldType::Date => {
            let text = value
                .as_str()
                .ok_or_else(|| "not a date string".to_string())?;
            // A declared format without chrono specifiers falls back to the
            // default, matching how operators historically wrote "YYYY-MM-DD".
            let format = field
                .format
                .as_deref()
                .filter(|f| f.contains('%'))
                .unwrap_or(DEFAULT_DATE_FORMAT);
            if NaiveDate::parse_from_str(text, format).is_ok()
                || NaiveDateTime::parse_from_str(text, format).is_ok()
            {
                Ok(())
            } else {
                Err(format!("date does not match {format}"))
            }
        }
        FieldType::Str => {
            if let Some(allowed) = &field.one_of {
                let member = value
                    .as_str()
                    .map(|s| allowed.iter().any(|a| a == s))
                    .unwrap_or(false);
                if !member {
                    return Err("enum".to_string());
                }
            }
            Ok(())
        }
    }
}

/// Accept integers, truncating floats, and numeric strings — anything
/// else is not coercible.
fn coerce_int(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| "not an integer".to_string()),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| "not an integer".to_string()),
        _ => Err("not an integer".to_string()),
    }
}

/// Shape check: `local@domain.tld`, no whitespace, exactly one `@`,
/// at least one dot in the domain.
fn is_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldSpec, FieldType};
    use serde_json::json;

    fn email_schema() -> Vec<FieldSpec> {
        vec![FieldSpec::new("email", FieldType::Email).required()]
    }

    #[test]
    fn missing_required_field_reports_required() {
        let errors = validate_inputs(&email_schema(), &json!({}));
        assert_eq!(errors.get("email").map(String::as_str), Some("required"));
    }

    #[test]
    fn null_counts_as_missing() {
        let errors = validate_inputs(&email_schema(), &json!({ "email": null }));
        assert_eq!(errors.get("email").map(String::as_str), Some("required"));
    }

    #[test]
    fn malformed_email_reports_invalid_email() {
        let errors = validate_inputs(&email_schema(), &json!({"email": "not-an-email"}));
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("invalid(email)")
        );
        let errors = validate_inputs(&email_schema(), &json!({"email": "a b@c.com"}));
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("invalid(email)")
        );
    }

    #[test]
    fn wellformed_email_passes() {
        let errors = validate_inputs(&email_schema(), &json!({"email": "a@b.com"}));
        assert!(errors.is_empty());
    }

    #[test]
    fn int_bounds_are_enforced() {
        let schema = vec![FieldSpec::new("days", FieldType::Int).range(1, 30)];
        assert!(validate_inputs(&schema, &json!({"days": 7})).is_empty());
        // Numeric strings coerce like the payloads query-string clients send.
        assert!(validate_inputs(&schema, &json!({"days": "7"})).is_empty());
        assert_eq!(
            validate_inputs(&schema, &json!({"days": 0}))
                .get("days")
                .map(String::as_str),
            Some("invalid(min)")
        );
        assert_eq!(
            validate_inputs(&schema, &json!({"days": 31}))
                .get("days")
                .map(String::as_str),
            Some("invalid(max)")
        );
        assert_eq!(
            validate_inputs(&schema, &json!({"days": "lots"}))
                .get("days")
                .map(String::as_str),
            Some("invalid(not an integer)")
        );
    }

    #[test]
    fn enum_membership_is_enforced() {
        let schema = vec![FieldSpec::new("segment", FieldType::Str).one_of(&["all", "news"])];
        assert!(validate_inputs(&schema, &json!({"segment": "news"})).is_empty());
        assert_eq!(
            validate_inputs(&schema, &json!({"segment": "users"}))
                .get("segment")
                .map(String::as_str),
            Some("invalid(enum)")
        );
    }

    #[test]
    fn dates_parse_against_declared_format() {
        let schema = vec![FieldSpec::new("when", FieldType::Date)];
        assert!(validate_inputs(&schema, &json!({"when": "2026-08-06"})).is_empty());
        assert!(!validate_inputs(&schema, &json!({"when": "06/08/2026"})).is_empty());

        let mut custom = FieldSpec::new("when", FieldType::Date);
        custom.format = Some("%d/%m/%Y".to_string());
        assert!(validate_inputs(&[custom], &json!({"when": "06/08/2026"})).is_empty());
    }

    #[test]
    fn optional_fields_and_unknown_keys_are_skipped() {
        let schema = vec![FieldSpec::new("days", FieldType::Int).range(1, 30)];
        let errors = validate_inputs(&schema, &json!({"unknown": "ignored"}));
        assert!(errors.is_empty());
    }

    #[test]
    fn non_object_payload_fails_required_fields_only() {
        let errors = validate_inputs(&email_schema(), &json!([1, 2, 3]));
        assert_eq!(errors.get("email").map(String::as_str), Some("required"));
    }
}
