//! OmniStack CRM gateway.
//!
//! OmniStack holds a mirrored user record per staff member that needs
//! communication or application access. All calls are keyed by the owning
//! client's API key, passed per request. Besides user create/delete, a set
//! of read-only listing endpoints is forwarded for the admin dashboard.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::GatewayError;

const SERVICE: &str = "omnistack";

/// Payload for creating a mirrored OmniStack user.
#[derive(Debug, Clone, Serialize)]
pub struct CrmCreateUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    /// Registration channel tag; provisioning always sends "manual".
    pub registration_source: String,
    /// Cross-references back into this system, e.g. {"crewdesk": "<staff id>"}.
    pub external_ids: Value,
}

/// A mirrored OmniStack user. OmniStack uses Mongo-style `_id` keys.
#[derive(Debug, Clone, Deserialize)]
pub struct CrmUser {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Common query parameters for the read-only passthrough listings.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl ListQuery {
    /// Build the query-string pairs, skipping unset parameters.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref status) = self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(ref from) = self.from_date {
            pairs.push(("from", from.clone()));
        }
        if let Some(ref to) = self.to_date {
            pairs.push(("to", to.clone()));
        }
        pairs
    }
}

/// Contract consumed from the OmniStack CRM. Implemented over HTTP in
/// production and by in-process fakes in tests.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    /// Create a mirrored user under the given client API key.
    async fn create_user(
        &self,
        api_key: &str,
        request: &CrmCreateUser,
    ) -> Result<CrmUser, GatewayError>;

    /// Delete a mirrored user. Deleting an id that is already gone counts
    /// as success (the remote delete is idempotent from our side).
    async fn delete_user(&self, api_key: &str, external_id: &str) -> Result<(), GatewayError>;

    /// Read-only passthrough: businesses owned by the client.
    async fn list_businesses(&self, api_key: &str, query: &ListQuery)
        -> Result<Value, GatewayError>;

    /// Read-only passthrough: the client's subscriptions.
    async fn list_subscriptions(
        &self,
        api_key: &str,
        query: &ListQuery,
    ) -> Result<Value, GatewayError>;

    /// Read-only passthrough: dashboard summary for the client.
    async fn dashboard_summary(&self, api_key: &str) -> Result<Value, GatewayError>;
}

/// HTTP implementation of the OmniStack gateway.
#[derive(Clone)]
pub struct OmniStackClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OmniStackClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, anyhow::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create OmniStack HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(
        &self,
        api_key: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, GatewayError> {
        let response = self
            .http_client
            .get(self.url(path))
            .header("x-api-key", api_key)
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Request {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse {
                service: SERVICE,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl CrmGateway for OmniStackClient {
    #[tracing::instrument(skip(self, api_key, request), fields(gateway = SERVICE, operation = "create_user", email = %request.email))]
    async fn create_user(
        &self,
        api_key: &str,
        request: &CrmCreateUser,
    ) -> Result<CrmUser, GatewayError> {
        let response = self
            .http_client
            .post(self.url("/users"))
            .header("x-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| GatewayError::Request {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CrmUser>()
            .await
            .map_err(|e| GatewayError::InvalidResponse {
                service: SERVICE,
                message: e.to_string(),
            })
    }

    #[tracing::instrument(skip(self, api_key), fields(gateway = SERVICE, operation = "delete_user", external_id = %external_id))]
    async fn delete_user(&self, api_key: &str, external_id: &str) -> Result<(), GatewayError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/users/{}", external_id)))
            .header("x-api-key", api_key)
            .send()
            .await
            .map_err(|source| GatewayError::Request {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if status.as_u16() == 404 {
            // Already gone; repeated deletes are a success, not an error
            tracing::debug!(external_id, "OmniStack user already deleted");
            return Ok(());
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, api_key, query), fields(gateway = SERVICE, operation = "list_businesses"))]
    async fn list_businesses(
        &self,
        api_key: &str,
        query: &ListQuery,
    ) -> Result<Value, GatewayError> {
        self.get_json(api_key, "/businesses", &query.to_query_pairs())
            .await
    }

    #[tracing::instrument(skip(self, api_key, query), fields(gateway = SERVICE, operation = "list_subscriptions"))]
    async fn list_subscriptions(
        &self,
        api_key: &str,
        query: &ListQuery,
    ) -> Result<Value, GatewayError> {
        self.get_json(api_key, "/subscriptions", &query.to_query_pairs())
            .await
    }

    #[tracing::instrument(skip(self, api_key), fields(gateway = SERVICE, operation = "dashboard_summary"))]
    async fn dashboard_summary(&self, api_key: &str) -> Result<Value, GatewayError> {
        self.get_json(api_key, "/dashboard/summary", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_skips_unset_params() {
        let query = ListQuery {
            page: Some(2),
            limit: Some(50),
            search: Some("jane".to_string()),
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "2".to_string()),
                ("limit", "50".to_string()),
                ("search", "jane".to_string()),
            ]
        );
        assert!(ListQuery::default().to_query_pairs().is_empty());
    }

    #[test]
    fn test_crm_user_deserializes_mongo_id() {
        let user: CrmUser = serde_json::from_str(r#"{"_id": "66f2a1b3c4"}"#).unwrap();
        assert_eq!(user.id, "66f2a1b3c4");
    }

    #[test]
    fn test_create_user_payload_shape() {
        let request = CrmCreateUser {
            name: "Jane".to_string(),
            surname: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            password: "p@ss".to_string(),
            registration_source: "manual".to_string(),
            external_ids: serde_json::json!({"crewdesk": "abc"}),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["registration_source"], "manual");
        assert_eq!(json["external_ids"]["crewdesk"], "abc");
    }
}
