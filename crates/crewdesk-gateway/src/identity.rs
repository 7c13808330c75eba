//! Identity provider gateway.
//!
//! Creates application logins (email + password) for staff granted full
//! app access. Only the create-user contract is consumed; logins are
//! removed out of band when a tenant is offboarded entirely.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::GatewayError;

const SERVICE: &str = "identity";

/// An account issued by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    pub id: String,
}

/// Contract consumed from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an application login for the given credentials.
    async fn create_user(&self, email: &str, password: &str)
        -> Result<IdentityUser, GatewayError>;
}

/// HTTP implementation against a Supabase-style admin API.
#[derive(Clone)]
pub struct SupabaseAdminClient {
    http_client: reqwest::Client,
    base_url: String,
    service_key: Option<String>,
}

impl SupabaseAdminClient {
    pub fn new(
        base_url: impl Into<String>,
        service_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create identity HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key,
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAdminClient {
    #[tracing::instrument(skip(self, password), fields(gateway = SERVICE, operation = "create_user", email = %email))]
    async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityUser, GatewayError> {
        let service_key =
            self.service_key
                .as_deref()
                .ok_or_else(|| GatewayError::NotConfigured {
                    service: SERVICE,
                    message: "IDENTITY_SERVICE_KEY is not set".to_string(),
                })?;

        let response = self
            .http_client
            .post(format!("{}/auth/v1/admin/users", self.base_url))
            .header("apikey", service_key)
            .bearer_auth(service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }))
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
            .json::<IdentityUser>()
            .await
            .map_err(|e| GatewayError::InvalidResponse {
                service: SERVICE,
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_user_requires_service_key() {
        let client = SupabaseAdminClient::new(
            "https://identity.example.com",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let err = client.create_user("jane@x.com", "p@ss").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = SupabaseAdminClient::new(
            "https://identity.example.com/",
            Some("key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://identity.example.com");
    }
}
