pub mod appointment;
pub mod dashboard;
pub mod doctor;
pub mod errors;
pub mod patient;
pub mod record;

pub use appointment::{Appointment, AppointmentStatus, DoctorRef, PatientRef};
pub use dashboard::DashboardStats;
pub use doctor::Doctor;
pub use errors::{ModelError, ModelResult, ValidationError, ValidationResult};
pub use patient::{Gender, Patient};
pub use record::{field_at, record_id, Record};

/// The three tables managed by the admin application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Patients,
    Doctors,
    Appointments,
}

impl Entity {
    /// Backend table name.
    pub fn table(&self) -> &'static str {
        match self {
            Entity::Patients => "patients",
            Entity::Doctors => "doctors",
            Entity::Appointments => "appointments",
        }
    }
}
