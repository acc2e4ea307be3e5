// admin_core/src/controller.rs

use std::sync::Arc;

use serde_json::{Number, Value};
use thiserror::Error;
use tracing::debug;

use backend_api::{DataService, DataServiceError, ListQuery};
use models::{field_at, record_id, Record, ValidationError, ValidationResult};

use crate::notify::NotifySink;
use crate::schema::{EntitySchema, FieldKind, FieldSpec};

#[derive(Debug, Error)]
pub enum ControllerError {
    /// List retrieval failed; the previously fetched rows were preserved.
    #[error("failed to fetch {entity}")]
    FetchFailed {
        entity: &'static str,
        #[source]
        source: DataServiceError,
    },
    /// An insert, update or delete failed; no local state was touched.
    #[error("failed to {action}")]
    WriteFailed {
        action: String,
        #[source]
        source: DataServiceError,
    },
    /// Caught before any network call; the submission was blocked.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
    /// A previous submit from this dialog has not settled yet; the call
    /// was dropped rather than raced against it.
    InFlight,
}

/// Drives the list/search/create/edit/delete lifecycle for one entity.
///
/// One controller instance owns the state behind one management screen:
/// the fetched rows, the search box, and the create/edit dialog. All
/// persistence goes through the [`DataService`] seam, and `items` is never
/// mutated speculatively — the list is only trusted after a server
/// round-trip.
pub struct EntityController<S, N> {
    schema: &'static EntitySchema,
    service: Arc<S>,
    notify: N,
    items: Vec<Record>,
    search_term: String,
    dialog_open: bool,
    editing: Option<Record>,
    form: Vec<(&'static str, String)>,
    submit_in_flight: bool,
    refresh_issued: u64,
}

impl<S: DataService, N: NotifySink> EntityController<S, N> {
    pub fn new(schema: &'static EntitySchema, service: Arc<S>, notify: N) -> Self {
        let form = schema
            .fields
            .iter()
            .map(|field| (field.name, field.default.to_string()))
            .collect();
        Self {
            schema,
            service,
            notify,
            items: Vec::new(),
            search_term: String::new(),
            dialog_open: false,
            editing: None,
            form,
            submit_in_flight: false,
            refresh_issued: 0,
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn editing(&self) -> Option<&Record> {
        self.editing.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Current draft value of a form field.
    pub fn form_value(&self, field: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrites one draft field. Names outside the schema are ignored:
    /// only declared fields exist on the form.
    pub fn set_form_value(&mut self, field: &str, value: impl Into<String>) {
        if let Some(slot) = self.form.iter_mut().find(|(name, _)| *name == field) {
            slot.1 = value.into();
        }
    }

    /// Opens the dialog with a blank draft for a new record.
    pub fn open_create(&mut self) {
        self.reset_form();
        self.dialog_open = true;
    }

    /// Opens the dialog pre-filled from an existing record. Null or absent
    /// optionals become empty strings in the draft.
    pub fn open_edit(&mut self, record: &Record) {
        for (slot, spec) in self.form.iter_mut().zip(self.schema.fields) {
            slot.1 = match record.get(spec.name) {
                Some(Value::String(text)) => text.clone(),
                Some(Value::Number(number)) => number.to_string(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
        }
        self.editing = Some(record.clone());
        self.dialog_open = true;
    }

    /// Abandons the dialog, dropping the draft.
    pub fn cancel(&mut self) {
        self.reset_form();
    }

    fn reset_form(&mut self) {
        for (slot, spec) in self.form.iter_mut().zip(self.schema.fields) {
            slot.1 = spec.default.to_string();
        }
        self.editing = None;
        self.dialog_open = false;
    }

    /// Replaces `items` with a fresh listing. On failure the previous rows
    /// stay untouched and a fetch notification is raised.
    pub async fn refresh(&mut self) -> Result<(), ControllerError> {
        let seq = self.begin_refresh();
        let query = self.list_query();
        let outcome = self.service.list(self.schema.entity, &query).await;
        self.finish_refresh(seq, outcome).map(|_| ())
    }

    fn list_query(&self) -> ListQuery<'static> {
        ListQuery {
            select: self.schema.select,
            order_field: self.schema.order_field,
            ascending: self.schema.ascending,
        }
    }

    fn begin_refresh(&mut self) -> u64 {
        self.refresh_issued += 1;
        self.refresh_issued
    }

    /// Applies a completed list round-trip. A response that is not the most
    /// recently issued request is discarded: the rendered list tracks the
    /// last request the user caused, not the last one the network finished.
    fn finish_refresh(
        &mut self,
        seq: u64,
        outcome: Result<Vec<Record>, DataServiceError>,
    ) -> Result<bool, ControllerError> {
        if seq != self.refresh_issued {
            debug!(
                entity = self.schema.noun,
                seq,
                latest = self.refresh_issued,
                "discarding stale list response"
            );
            return Ok(false);
        }
        match outcome {
            Ok(rows) => {
                self.items = rows;
                Ok(true)
            }
            Err(source) => {
                self.notify
                    .error(&format!("Failed to fetch {}", self.schema.entity.table()));
                Err(ControllerError::FetchFailed {
                    entity: self.schema.entity.table(),
                    source,
                })
            }
        }
    }

    /// Persists the draft: an update when a record is under edit, an insert
    /// otherwise. At most one submit per dialog session is in flight; calls
    /// made while one is pending are dropped.
    ///
    /// On success the dialog closes, the draft resets and the list is
    /// re-fetched. On failure both dialog and draft survive for a retry.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ControllerError> {
        if self.submit_in_flight {
            debug!(entity = self.schema.noun, "submit already in flight, dropped");
            return Ok(SubmitOutcome::InFlight);
        }
        self.validate()?;
        let payload = self.payload()?;

        self.submit_in_flight = true;
        let outcome = self.perform_submit(payload).await;
        self.submit_in_flight = false;

        match outcome {
            Ok(kind) => {
                let past = match kind {
                    SubmitOutcome::Updated => "updated",
                    _ => self.schema.create_verb_past,
                };
                self.notify
                    .success(&format!("{} {} successfully", self.schema.title, past));
                self.reset_form();
                if let Err(err) = self.refresh().await {
                    // the write itself landed; the fetch failure was notified
                    debug!(entity = self.schema.noun, error = %err, "post-submit refresh failed");
                }
                Ok(kind)
            }
            Err(err) => {
                if let ControllerError::WriteFailed { action, .. } = &err {
                    self.notify.error(&format!("Failed to {action}"));
                }
                Err(err)
            }
        }
    }

    async fn perform_submit(&self, mut payload: Record) -> Result<SubmitOutcome, ControllerError> {
        if let Some(editing) = &self.editing {
            let id = record_id(editing)
                .ok_or(ValidationError::MissingId)?
                .to_string();
            let action = format!("update {}", self.schema.noun);
            self.service
                .update(self.schema.entity, &id, payload)
                .await
                .map_err(|source| ControllerError::WriteFailed { action, source })?;
            Ok(SubmitOutcome::Updated)
        } else {
            // the acting user is looked up fresh on every insert, never cached
            if let Some(user) = self.service.current_user_id().await {
                payload.insert("created_by".to_string(), Value::String(user));
            }
            let action = format!("{} {}", self.schema.create_verb, self.schema.noun);
            self.service
                .insert(self.schema.entity, payload)
                .await
                .map_err(|source| ControllerError::WriteFailed { action, source })?;
            Ok(SubmitOutcome::Created)
        }
    }

    /// Deletes a record by id. The local list is never touched directly;
    /// the follow-up refresh is the only source of truth.
    pub async fn remove(&mut self, id: &str) -> Result<(), ControllerError> {
        match self.service.delete(self.schema.entity, id).await {
            Ok(()) => {
                self.notify
                    .success(&format!("{} deleted successfully", self.schema.title));
                if let Err(err) = self.refresh().await {
                    debug!(entity = self.schema.noun, error = %err, "post-delete refresh failed");
                }
                Ok(())
            }
            Err(source) => {
                let action = format!("delete {}", self.schema.noun);
                self.notify.error(&format!("Failed to {action}"));
                Err(ControllerError::WriteFailed { action, source })
            }
        }
    }

    /// Lazy view over `items` matching the current search term. Every
    /// searchable path is compared case-insensitively; rows missing a field
    /// never match on it. An empty term passes everything through.
    pub fn filtered(&self) -> impl Iterator<Item = &Record> + '_ {
        let needle = self.search_term.to_lowercase();
        self.items.iter().filter(move |record| {
            if needle.is_empty() {
                return true;
            }
            self.schema.searchable.iter().any(|path| {
                field_at(record, path)
                    .and_then(Value::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
    }

    /// Finds a fetched record by id.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.items.iter().find(|record| record_id(record) == Some(id))
    }

    fn validate(&self) -> ValidationResult<()> {
        for spec in self.schema.fields {
            if spec.required && self.form_value(spec.name).unwrap_or("").trim().is_empty() {
                return Err(ValidationError::MissingRequired(spec.name.to_string()));
            }
        }
        Ok(())
    }

    /// Builds the write payload from the draft, coercing typed fields.
    fn payload(&self) -> ValidationResult<Record> {
        let mut record = Record::new();
        for ((_, raw), spec) in self.form.iter().zip(self.schema.fields) {
            record.insert(spec.name.to_string(), coerce(spec, raw)?);
        }
        Ok(record)
    }
}

fn coerce(spec: &FieldSpec, raw: &str) -> ValidationResult<Value> {
    let trimmed = raw.trim();
    match spec.kind {
        FieldKind::Integer => {
            if trimmed.is_empty() {
                // required emptiness is rejected before coercion runs
                return Ok(Value::Null);
            }
            trimmed
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .map_err(|_| ValidationError::InvalidInteger(spec.name.to_string()))
        }
        FieldKind::Decimal => {
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| ValidationError::InvalidDecimal(spec.name.to_string()))
        }
        _ => Ok(Value::String(raw.to_string())),
    }
}
