// backend_api/src/rest.rs

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use models::{Entity, Record};

use crate::config::BackendConfig;
use crate::service::{DataService, DataServiceError, ListQuery};

/// REST client for the hosted backend-as-a-service. Tables are exposed
/// under `{base_url}/rest/v1/{table}` in the PostgREST dialect; the
/// signed-in user is read from `{base_url}/auth/v1/user`.
#[derive(Debug, Clone)]
pub struct RestDataService {
    client: Client,
    config: BackendConfig,
}

#[derive(Debug, Deserialize)]
struct AuthenticatedUser {
    id: String,
}

impl RestDataService {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn table_url(&self, entity: Entity) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            entity.table()
        )
    }

    fn bearer(&self) -> &str {
        self.config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.bearer())
    }

    async fn check(response: Response) -> Result<Response, DataServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(DataServiceError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Writes ask for `Prefer: return=representation`, so the stored row
    /// comes back wrapped in a one-element array.
    async fn decode_single(response: Response) -> Result<Record, DataServiceError> {
        let body = Self::check(response).await?.text().await?;
        let mut rows: Vec<Record> = serde_json::from_str(&body)?;
        rows.pop().ok_or_else(|| DataServiceError::Api {
            status: 200,
            message: "write returned no representation".to_string(),
        })
    }
}

#[async_trait]
impl DataService for RestDataService {
    async fn list(
        &self,
        entity: Entity,
        query: &ListQuery<'_>,
    ) -> Result<Vec<Record>, DataServiceError> {
        let direction = if query.ascending { "asc" } else { "desc" };
        let order = format!("{}.{}", query.order_field, direction);
        let response = self
            .request(Method::GET, &self.table_url(entity))
            .query(&[("select", query.select), ("order", order.as_str())])
            .send()
            .await?;
        let body = Self::check(response).await?.text().await?;
        let rows: Vec<Record> = serde_json::from_str(&body)?;
        debug!(table = entity.table(), rows = rows.len(), "listed rows");
        Ok(rows)
    }

    async fn insert(&self, entity: Entity, record: Record) -> Result<Record, DataServiceError> {
        let response = self
            .request(Method::POST, &self.table_url(entity))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        Self::decode_single(response).await
    }

    async fn update(
        &self,
        entity: Entity,
        id: &str,
        record: Record,
    ) -> Result<Record, DataServiceError> {
        let response = self
            .request(Method::PATCH, &self.table_url(entity))
            .query(&[("id", format!("eq.{id}").as_str())])
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        Self::decode_single(response).await
    }

    async fn delete(&self, entity: Entity, id: &str) -> Result<(), DataServiceError> {
        let response = self
            .request(Method::DELETE, &self.table_url(entity))
            .query(&[("id", format!("eq.{id}").as_str())])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn count(&self, entity: Entity) -> Result<u64, DataServiceError> {
        let response = self
            .request(Method::GET, &self.table_url(entity))
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .header(header::RANGE, "0-0")
            .send()
            .await?;
        let response = Self::check(response).await?;
        // content-range is "0-0/42"; the total rides after the slash
        response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| DataServiceError::Api {
                status: 200,
                message: "count response missing content-range total".to_string(),
            })
    }

    async fn current_user_id(&self) -> Option<String> {
        let token = self.config.access_token.as_deref()?;
        let url = format!(
            "{}/auth/v1/user",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(token)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "acting-user lookup rejected");
            return None;
        }
        response
            .json::<AuthenticatedUser>()
            .await
            .ok()
            .map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::RestDataService;
    use crate::config::BackendConfig;
    use models::Entity;

    fn service(access_token: Option<&str>) -> RestDataService {
        RestDataService::new(BackendConfig {
            base_url: "https://demo.example.co/".to_string(),
            api_key: "anon-key".to_string(),
            access_token: access_token.map(str::to_string),
        })
    }

    #[test]
    fn table_urls_are_rooted_under_rest_v1() {
        let service = service(None);
        assert_eq!(
            service.table_url(Entity::Appointments),
            "https://demo.example.co/rest/v1/appointments"
        );
    }

    #[test]
    fn bearer_falls_back_to_the_api_key() {
        assert_eq!(service(None).bearer(), "anon-key");
        assert_eq!(service(Some("user-jwt")).bearer(), "user-jwt");
    }
}
