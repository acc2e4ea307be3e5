pub mod controller;
pub mod notify;
pub mod schema;
pub mod shell;

pub use controller::{ControllerError, EntityController, SubmitOutcome};
pub use notify::{NotifySink, TracingNotifier};
pub use schema::{
    appointments_schema, doctors_schema, patients_schema, EntitySchema, FieldKind, FieldSpec,
};
pub use shell::{AdminShell, BookingChoices, DoctorChoice, PatientChoice};
