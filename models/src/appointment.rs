// models/src/appointment.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ModelResult, ValidationError};
use crate::record::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ValidationError::UnknownValue {
                what: "appointment status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        })
    }
}

/// Read-only patient projection joined onto an appointment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRef {
    pub full_name: String,
}

/// Read-only doctor projection joined onto an appointment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRef {
    pub full_name: String,
    pub specialization: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Populated by the backend join at read time, never written back.
    #[serde(default)]
    pub patients: Option<PatientRef>,
    #[serde(default)]
    pub doctors: Option<DoctorRef>,
}

impl Appointment {
    /// Typed view over a backend row, join projections included.
    pub fn from_record(record: &Record) -> ModelResult<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(record.clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Appointment, AppointmentStatus};
    use core::str::FromStr;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(
            AppointmentStatus::from_str("Cancelled").unwrap(),
            AppointmentStatus::Cancelled
        );
        assert_eq!(AppointmentStatus::Scheduled.to_string(), "scheduled");
        assert!(AppointmentStatus::from_str("postponed").is_err());
    }

    #[test]
    fn appointment_decodes_with_join_projections() {
        let row = match json!({
            "id": "0d9e8f70-11a2-4b3c-8d4e-5f6a7b8c0003",
            "patient_id": "7f9c0e1a-9a2b-4a57-8a44-1f0f5f3f0001",
            "doctor_id": "6a1b9c70-55b1-43a5-9f7e-2b8a7c9d0002",
            "appointment_date": "2025-03-10",
            "appointment_time": "10:30:00",
            "status": "scheduled",
            "reason": "follow-up",
            "notes": null,
            "created_at": "2025-03-01T08:00:00Z",
            "patients": { "full_name": "Alice Moore" },
            "doctors": { "full_name": "Gregory Okafor", "specialization": "Cardiology" }
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };

        let appointment = Appointment::from_record(&row).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.patients.unwrap().full_name, "Alice Moore");
        assert_eq!(appointment.doctors.unwrap().specialization, "Cardiology");
        assert_eq!(appointment.notes, None);
    }
}
