// backend_api/src/service.rs

use async_trait::async_trait;
use thiserror::Error;

use models::{Entity, Record};

/// Query shape for a table listing.
#[derive(Debug, Clone, Copy)]
pub struct ListQuery<'a> {
    /// Column projection in the backend's select syntax; join projections
    /// ride along here (e.g. `*,patients(full_name)`).
    pub select: &'a str,
    pub order_field: &'a str,
    pub ascending: bool,
}

/// Errors surfaced by the hosted backend. The core treats every variant as
/// opaque and non-retriable; recovery is an explicit user retry.
#[derive(Debug, Error)]
pub enum DataServiceError {
    #[error("backend transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("backend response decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend configuration error: {0}")]
    Config(String),
}

/// The hosted backend the admin application delegates to. Everything that
/// persists or authenticates lives behind this seam; the controllers never
/// see a connection, a table schema, or a session.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Full listing of a table, ordered server-side.
    async fn list(
        &self,
        entity: Entity,
        query: &ListQuery<'_>,
    ) -> Result<Vec<Record>, DataServiceError>;

    /// Inserts one record; the backend assigns `id` and `created_at` and
    /// returns the stored row.
    async fn insert(&self, entity: Entity, record: Record) -> Result<Record, DataServiceError>;

    /// Replaces the record with the given id and returns the stored row.
    async fn update(
        &self,
        entity: Entity,
        id: &str,
        record: Record,
    ) -> Result<Record, DataServiceError>;

    /// Hard-deletes the record with the given id.
    async fn delete(&self, entity: Entity, id: &str) -> Result<(), DataServiceError>;

    /// Exact row count of a table.
    async fn count(&self, entity: Entity) -> Result<u64, DataServiceError>;

    /// Identifier of the acting user, looked up fresh on every call.
    /// `None` when no session token is configured or the backend rejects it.
    async fn current_user_id(&self) -> Option<String>;
}
