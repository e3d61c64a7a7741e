//! Typed access to loosely structured record fields.
//!
//! Submission payloads and remote records carry their fields as a JSON object
//! keyed by field code. A field is either a plain JSON value or wrapped as
//! `{ "type": .., "value": .. }` (the REST record API shape). Readers here fail
//! with [`DomainError::MalformedInput`] instead of coercing.

use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// Look up a field and unwrap `{ "value": .. }` if present.
pub fn field<'a>(fields: &'a Map<String, Value>, code: &str) -> Option<&'a Value> {
    let raw = fields.get(code)?;
    match raw {
        Value::Object(obj) if obj.contains_key("value") => obj.get("value"),
        other => Some(other),
    }
}

/// Read a required, non-blank string field.
pub fn read_string(fields: &Map<String, Value>, code: &str) -> DomainResult<String> {
    match field(fields, code) {
        None | Some(Value::Null) => Err(DomainError::malformed(format!("field `{code}` is missing"))),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(DomainError::malformed(format!("field `{code}` is empty")))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(DomainError::malformed(format!(
            "field `{code}` must be text, got {other}"
        ))),
    }
}

/// Read a required integer field.
///
/// Accepts JSON integers and strings holding an integer (record APIs send
/// numeric fields as strings). Fractions, blanks and anything else are rejected.
pub fn read_integer(fields: &Map<String, Value>, code: &str) -> DomainResult<i64> {
    let value = match field(fields, code) {
        None | Some(Value::Null) => {
            return Err(DomainError::malformed(format!("field `{code}` is missing")));
        }
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| DomainError::malformed(format!("field `{code}` is not an integer: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn wrapped_and_plain_fields_read_the_same() {
        let wrapped = fields(json!({ "qty": { "type": "NUMBER", "value": "5" } }));
        let plain = fields(json!({ "qty": 5 }));

        assert_eq!(read_integer(&wrapped, "qty").unwrap(), 5);
        assert_eq!(read_integer(&plain, "qty").unwrap(), 5);
    }

    #[test]
    fn missing_and_non_numeric_fields_are_malformed() {
        let f = fields(json!({ "qty": { "value": "five" }, "code": { "value": "" } }));

        assert!(matches!(read_integer(&f, "qty"), Err(DomainError::MalformedInput(_))));
        assert!(matches!(read_integer(&f, "absent"), Err(DomainError::MalformedInput(_))));
        assert!(matches!(read_string(&f, "code"), Err(DomainError::MalformedInput(_))));
    }

    #[test]
    fn fractional_numbers_are_rejected() {
        let f = fields(json!({ "qty": 2.5 }));
        assert!(read_integer(&f, "qty").is_err());
    }

    #[test]
    fn numeric_codes_read_as_text() {
        let f = fields(json!({ "item_code": { "value": 1001 } }));
        assert_eq!(read_string(&f, "item_code").unwrap(), "1001");
    }
}
