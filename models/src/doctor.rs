// models/src/doctor.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelResult;
use crate::record::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: String,
    pub phone: String,
    pub email: String,
    pub qualification: String,
    pub experience_years: i64,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    /// Typed view over a backend row.
    pub fn from_record(record: &Record) -> ModelResult<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(record.clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::Doctor;
    use serde_json::json;

    #[test]
    fn doctor_decodes_with_a_null_fee() {
        let row = match json!({
            "id": "6a1b9c70-55b1-43a5-9f7e-2b8a7c9d0002",
            "full_name": "Gregory Okafor",
            "specialization": "Cardiology",
            "phone": "555-0130",
            "email": "g.okafor@example.org",
            "qualification": "MD",
            "experience_years": 12,
            "consultation_fee": null,
            "created_at": "2025-01-20T14:00:00Z"
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let doctor = Doctor::from_record(&row).unwrap();
        assert_eq!(doctor.experience_years, 12);
        assert_eq!(doctor.consultation_fee, None);
        assert_eq!(doctor.created_by, None);
    }
}
