use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Anything that is not a JSON object collapses to an empty object, so the
/// caller sees a missing-field error instead of a parse error.
pub fn get_object(body: &Bytes) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Trimmed text for `key`. Only JSON strings count, `None` for anything else or blank.
pub fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    let text = object.get(key)?.as_str()?.trim();

    (!text.is_empty()).then(|| text.to_string())
}

/// `Ok(None)` when absent or null. Numeric strings are accepted, anything else
/// that is not a finite number is rejected.
pub fn number_field(object: &Map<String, Value>, key: &str) -> Result<Option<f64>, AppError> {
    let number = match object.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(AppError::validation(format!("{key} must be a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_malformed_body() {
        assert!(get_object(&Bytes::from_static(b"{oops")).is_empty());
        assert!(get_object(&Bytes::from_static(b"[1,2]")).is_empty());
        assert!(get_object(&Bytes::new()).is_empty());
        assert_eq!(get_object(&Bytes::from_static(br#"{"a":1}"#)).len(), 1);
    }

    #[test]
    fn test_text_field() {
        let body = object(json!({
            "name": "  Jane Doe ",
            "blank": "   ",
            "number": 42,
            "null": null,
            "list": ["x"],
        }));

        assert_eq!(text_field(&body, "name").as_deref(), Some("Jane Doe"));
        assert_eq!(text_field(&body, "blank"), None);
        assert_eq!(text_field(&body, "number"), None);
        assert_eq!(text_field(&body, "null"), None);
        assert_eq!(text_field(&body, "list"), None);
        assert_eq!(text_field(&body, "missing"), None);
    }

    #[test]
    fn test_number_field() {
        let body = object(json!({
            "int": 3,
            "float": 25.5,
            "string": " 12 ",
            "empty": "",
            "word": "lots",
            "flag": true,
            "null": null,
        }));

        assert_eq!(number_field(&body, "int").unwrap(), Some(3.0));
        assert_eq!(number_field(&body, "float").unwrap(), Some(25.5));
        assert_eq!(number_field(&body, "string").unwrap(), Some(12.0));
        assert_eq!(number_field(&body, "empty").unwrap(), None);
        assert_eq!(number_field(&body, "null").unwrap(), None);
        assert_eq!(number_field(&body, "missing").unwrap(), None);
        assert!(number_field(&body, "word").is_err());
        assert!(number_field(&body, "flag").is_err());
    }

    #[test]
    fn test_non_finite_string() {
        let body = object(json!({ "amount": "NaN", "other": "inf" }));

        assert!(number_field(&body, "amount").is_err());
        assert!(number_field(&body, "other").is_err());
    }
}
