// admin_core/src/schema.rs

use models::Entity;

/// How a form field is typed and coerced on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Time,
    /// One of a fixed set of lowercase values.
    Select(&'static [&'static str]),
    Integer,
    Decimal,
    /// Foreign id of another entity's row.
    Reference,
}

/// One field of an entity's create/edit form.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Draft value a blank form starts from.
    pub default: &'static str,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: "",
        }
    }

    const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: "",
        }
    }

    const fn with_default(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default,
        }
    }
}

/// Everything the generic controller needs to know about one entity: the
/// form layout, how to ask the backend for the list, and which fields the
/// search box looks at.
#[derive(Debug)]
pub struct EntitySchema {
    pub entity: Entity,
    /// Capitalized singular used in success notifications ("Patient").
    pub title: &'static str,
    /// Lowercase singular used in failure notifications ("patient").
    pub noun: &'static str,
    /// Verb pair for record creation: add/added for people, book/booked
    /// for appointments.
    pub create_verb: &'static str,
    pub create_verb_past: &'static str,
    pub fields: &'static [FieldSpec],
    /// Dotted paths matched case-insensitively by the search box; paths may
    /// descend into join projections (`patients.full_name`).
    pub searchable: &'static [&'static str],
    /// Backend column projection; join projections ride along here.
    pub select: &'static str,
    pub order_field: &'static str,
    pub ascending: bool,
}

pub const GENDERS: &[&str] = &["male", "female", "other"];
pub const APPOINTMENT_STATUSES: &[&str] = &["scheduled", "completed", "cancelled"];

static PATIENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("full_name", FieldKind::Text),
    FieldSpec::required("date_of_birth", FieldKind::Date),
    FieldSpec::with_default("gender", FieldKind::Select(GENDERS), "male"),
    FieldSpec::required("phone", FieldKind::Text),
    FieldSpec::optional("email", FieldKind::Text),
    FieldSpec::optional("address", FieldKind::Text),
    FieldSpec::optional("medical_history", FieldKind::Text),
];

static PATIENTS: EntitySchema = EntitySchema {
    entity: Entity::Patients,
    title: "Patient",
    noun: "patient",
    create_verb: "add",
    create_verb_past: "added",
    fields: PATIENT_FIELDS,
    searchable: &["full_name", "phone", "email"],
    select: "*",
    order_field: "created_at",
    ascending: false,
};

static DOCTOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("full_name", FieldKind::Text),
    FieldSpec::required("specialization", FieldKind::Text),
    FieldSpec::required("phone", FieldKind::Text),
    FieldSpec::required("email", FieldKind::Text),
    FieldSpec::required("qualification", FieldKind::Text),
    FieldSpec::required("experience_years", FieldKind::Integer),
    FieldSpec::optional("consultation_fee", FieldKind::Decimal),
];

static DOCTORS: EntitySchema = EntitySchema {
    entity: Entity::Doctors,
    title: "Doctor",
    noun: "doctor",
    create_verb: "add",
    create_verb_past: "added",
    fields: DOCTOR_FIELDS,
    searchable: &["full_name", "specialization", "email"],
    select: "*",
    order_field: "created_at",
    ascending: false,
};

static APPOINTMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("patient_id", FieldKind::Reference),
    FieldSpec::required("doctor_id", FieldKind::Reference),
    FieldSpec::required("appointment_date", FieldKind::Date),
    FieldSpec::required("appointment_time", FieldKind::Time),
    FieldSpec::with_default("status", FieldKind::Select(APPOINTMENT_STATUSES), "scheduled"),
    FieldSpec::optional("reason", FieldKind::Text),
    FieldSpec::optional("notes", FieldKind::Text),
];

static APPOINTMENTS: EntitySchema = EntitySchema {
    entity: Entity::Appointments,
    title: "Appointment",
    noun: "appointment",
    create_verb: "book",
    create_verb_past: "booked",
    fields: APPOINTMENT_FIELDS,
    searchable: &["patients.full_name", "doctors.full_name"],
    select: "*,patients(full_name),doctors(full_name,specialization)",
    order_field: "appointment_date",
    ascending: false,
};

pub fn patients_schema() -> &'static EntitySchema {
    &PATIENTS
}

pub fn doctors_schema() -> &'static EntitySchema {
    &DOCTORS
}

pub fn appointments_schema() -> &'static EntitySchema {
    &APPOINTMENTS
}

#[cfg(test)]
mod tests {
    use super::{appointments_schema, doctors_schema, patients_schema, FieldKind};

    #[test]
    fn defaults_cover_every_select_field() {
        for schema in [patients_schema(), doctors_schema(), appointments_schema()] {
            for field in schema.fields {
                if let FieldKind::Select(options) = field.kind {
                    assert!(
                        options.contains(&field.default),
                        "{}.{} defaults outside its option set",
                        schema.noun,
                        field.name
                    );
                }
            }
        }
    }

    #[test]
    fn appointment_listing_projects_both_joins() {
        let schema = appointments_schema();
        assert!(schema.select.contains("patients(full_name)"));
        assert!(schema.select.contains("doctors(full_name,specialization)"));
        assert_eq!(schema.order_field, "appointment_date");
        assert!(!schema.ascending);
    }
}
