// models/src/record.rs

use serde_json::Value;

/// A raw backend row. Rows stay loosely typed on their way through the
/// generic controller so that one implementation serves every entity; the
/// typed views in this crate deserialize from them at the API edge.
pub type Record = serde_json::Map<String, Value>;

/// Server-assigned identifier of a row, if present.
pub fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Resolves a dotted path such as `patients.full_name` inside a row,
/// descending into join projections attached by the backend.
pub fn field_at<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut value = record.get(parts.next()?)?;
    for part in parts {
        value = value.as_object()?.get(part)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::{field_at, record_id, Record};
    use serde_json::json;

    fn row() -> Record {
        match json!({
            "id": "7f9c0e1a-9a2b-4a57-8a44-1f0f5f3f0001",
            "appointment_date": "2025-03-10",
            "patients": { "full_name": "Alice Moore" }
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn id_is_read_as_a_string() {
        assert_eq!(record_id(&row()), Some("7f9c0e1a-9a2b-4a57-8a44-1f0f5f3f0001"));
    }

    #[test]
    fn dotted_paths_descend_into_joins() {
        let row = row();
        assert_eq!(
            field_at(&row, "patients.full_name").and_then(|v| v.as_str()),
            Some("Alice Moore")
        );
        assert!(field_at(&row, "doctors.full_name").is_none());
    }
}
