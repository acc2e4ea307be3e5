// admin_core/src/shell.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backend_api::{DataService, DataServiceError, ListQuery};
use models::{DashboardStats, Entity, Record};

use crate::controller::EntityController;
use crate::notify::NotifySink;
use crate::schema::{appointments_schema, doctors_schema, patients_schema};

/// One patient option for the booking form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientChoice {
    pub id: Uuid,
    pub full_name: String,
}

/// One doctor option for the booking form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorChoice {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: String,
}

/// Dropdown option lists backing the appointment dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingChoices {
    pub patients: Vec<PatientChoice>,
    pub doctors: Vec<DoctorChoice>,
}

/// The admin dashboard: three entity controllers over one backend handle,
/// plus the aggregate counters shown on top. The controllers share nothing
/// but the service handle and never coordinate with each other.
pub struct AdminShell<S, N> {
    service: Arc<S>,
    pub patients: EntityController<S, N>,
    pub doctors: EntityController<S, N>,
    pub appointments: EntityController<S, N>,
}

impl<S: DataService, N: NotifySink + Clone> AdminShell<S, N> {
    pub fn new(service: Arc<S>, notify: N) -> Self {
        Self {
            patients: EntityController::new(patients_schema(), Arc::clone(&service), notify.clone()),
            doctors: EntityController::new(doctors_schema(), Arc::clone(&service), notify.clone()),
            appointments: EntityController::new(
                appointments_schema(),
                Arc::clone(&service),
                notify,
            ),
            service,
        }
    }

    /// Initial load. Every tab fetches independently; one failing tab does
    /// not block the others, and each failure has already been notified.
    pub async fn refresh_all(&mut self) {
        let _ = self.patients.refresh().await;
        let _ = self.doctors.refresh().await;
        let _ = self.appointments.refresh().await;
    }

    /// Aggregate record counts for the dashboard header.
    pub async fn stats(&self) -> Result<DashboardStats, DataServiceError> {
        Ok(DashboardStats {
            patients: self.service.count(Entity::Patients).await?,
            doctors: self.service.count(Entity::Doctors).await?,
            appointments: self.service.count(Entity::Appointments).await?,
        })
    }

    /// Patient and doctor option lists for the booking dialog, ordered by
    /// name the way the form presents them.
    pub async fn booking_choices(&self) -> Result<BookingChoices, DataServiceError> {
        let patients = self
            .service
            .list(
                Entity::Patients,
                &ListQuery {
                    select: "id,full_name",
                    order_field: "full_name",
                    ascending: true,
                },
            )
            .await?;
        let doctors = self
            .service
            .list(
                Entity::Doctors,
                &ListQuery {
                    select: "id,full_name,specialization",
                    order_field: "full_name",
                    ascending: true,
                },
            )
            .await?;
        Ok(BookingChoices {
            patients: decode_choices(patients)?,
            doctors: decode_choices(doctors)?,
        })
    }
}

fn decode_choices<T: serde::de::DeserializeOwned>(
    rows: Vec<Record>,
) -> Result<Vec<T>, DataServiceError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(serde_json::Value::Object(row)).map_err(DataServiceError::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::AdminShell;
    use crate::notify::NotifySink;

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use backend_api::{DataService, DataServiceError, ListQuery};
    use models::{Entity, Record};

    struct CountingService {
        counts: [u64; 3],
        list_queries: Mutex<Vec<(Entity, String, bool)>>,
    }

    impl CountingService {
        fn new(counts: [u64; 3]) -> Self {
            Self {
                counts,
                list_queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DataService for CountingService {
        async fn list(
            &self,
            entity: Entity,
            query: &ListQuery<'_>,
        ) -> Result<Vec<Record>, DataServiceError> {
            self.list_queries.lock().unwrap().push((
                entity,
                query.order_field.to_string(),
                query.ascending,
            ));
            let row = match entity {
                Entity::Patients => json!({
                    "id": "7f9c0e1a-9a2b-4a57-8a44-1f0f5f3f0001",
                    "full_name": "Alice Moore"
                }),
                Entity::Doctors => json!({
                    "id": "6a1b9c70-55b1-43a5-9f7e-2b8a7c9d0002",
                    "full_name": "Gregory Okafor",
                    "specialization": "Cardiology"
                }),
                Entity::Appointments => json!({}),
            };
            match row {
                serde_json::Value::Object(map) => Ok(vec![map]),
                _ => unreachable!(),
            }
        }

        async fn insert(
            &self,
            _entity: Entity,
            record: Record,
        ) -> Result<Record, DataServiceError> {
            Ok(record)
        }

        async fn update(
            &self,
            _entity: Entity,
            _id: &str,
            record: Record,
        ) -> Result<Record, DataServiceError> {
            Ok(record)
        }

        async fn delete(&self, _entity: Entity, _id: &str) -> Result<(), DataServiceError> {
            Ok(())
        }

        async fn count(&self, entity: Entity) -> Result<u64, DataServiceError> {
            Ok(match entity {
                Entity::Patients => self.counts[0],
                Entity::Doctors => self.counts[1],
                Entity::Appointments => self.counts[2],
            })
        }

        async fn current_user_id(&self) -> Option<String> {
            None
        }
    }

    #[derive(Clone, Default)]
    struct SilentNotifier;

    impl NotifySink for SilentNotifier {
        fn success(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
    }

    #[tokio::test]
    async fn stats_aggregates_the_three_counts() {
        let shell = AdminShell::new(Arc::new(CountingService::new([12, 4, 31])), SilentNotifier);
        let stats = shell.stats().await.unwrap();
        assert_eq!(stats.patients, 12);
        assert_eq!(stats.doctors, 4);
        assert_eq!(stats.appointments, 31);
    }

    #[tokio::test]
    async fn booking_choices_are_fetched_name_ascending() {
        let service = Arc::new(CountingService::new([0, 0, 0]));
        let shell = AdminShell::new(Arc::clone(&service), SilentNotifier);

        let choices = shell.booking_choices().await.unwrap();
        assert_eq!(choices.patients[0].full_name, "Alice Moore");
        assert_eq!(choices.doctors[0].specialization, "Cardiology");

        let queries = service.list_queries.lock().unwrap();
        assert_eq!(
            *queries,
            vec![
                (Entity::Patients, "full_name".to_string(), true),
                (Entity::Doctors, "full_name".to_string(), true),
            ]
        );
    }
}
