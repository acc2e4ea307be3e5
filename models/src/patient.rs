// models/src/patient.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ModelResult, ValidationError};
use crate::record::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ValidationError::UnknownValue {
                what: "gender",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub gender: Gender,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Typed view over a backend row.
    pub fn from_record(record: &Record) -> ModelResult<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(record.clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Gender, Patient};
    use crate::errors::ValidationError;
    use core::str::FromStr;
    use serde_json::json;

    #[test]
    fn gender_round_trips_through_strings() {
        assert_eq!(Gender::from_str("Female").unwrap(), Gender::Female);
        assert_eq!(Gender::Female.to_string(), "female");
        assert_eq!(Gender::default(), Gender::Male);
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let err = Gender::from_str("unspecified").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownValue {
                what: "gender",
                value: "unspecified".to_string()
            }
        );
    }

    #[test]
    fn patient_decodes_from_a_backend_row() {
        let row = match json!({
            "id": "7f9c0e1a-9a2b-4a57-8a44-1f0f5f3f0001",
            "full_name": "Alice Moore",
            "date_of_birth": "1989-04-12",
            "gender": "female",
            "phone": "555-0102",
            "email": null,
            "address": null,
            "medical_history": "asthma",
            "created_by": null,
            "created_at": "2025-02-01T09:30:00Z"
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let patient = Patient::from_record(&row).unwrap();
        assert_eq!(patient.full_name, "Alice Moore");
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.email, None);
        assert_eq!(patient.medical_history.as_deref(), Some("asthma"));
    }
}
