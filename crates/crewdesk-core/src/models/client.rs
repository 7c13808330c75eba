use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Client (tenant) type. Decides which provisioning branch applies
/// when onboarding staff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[sqlx(type_name = "client_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    /// Booking-style tenant (venues, reservations). Staff never get
    /// application access; accounts are for communication only.
    Booking,
    /// Standard sales tenant. Staff may be granted full application access.
    Sales,
}

/// Client status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[sqlx(type_name = "client_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Suspended,
    Deleted,
}

/// Client (tenant) entity. Owns staff, departments, and the per-tenant
/// OmniStack gateway API key. Read-only for the provisioning workflow.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub client_type: ClientType,
    /// Per-tenant OmniStack API key. Never serialized in responses.
    #[serde(skip_serializing)]
    pub omni_gateway_api_key: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client shape returned over the API (no gateway key, but a flag telling
/// callers whether the OmniStack integration is configured).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub client_type: ClientType,
    pub omnistack_connected: bool,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        ClientResponse {
            id: client.id,
            name: client.name,
            client_type: client.client_type,
            omnistack_connected: client.omni_gateway_api_key.is_some(),
            status: client.status,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_response_never_leaks_gateway_key() {
        let client = Client {
            id: Uuid::new_v4(),
            name: "MetroSuites".to_string(),
            client_type: ClientType::Booking,
            omni_gateway_api_key: Some("sk_live_secret".to_string()),
            status: ClientStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = ClientResponse::from(client.clone());
        assert!(response.omnistack_connected);

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("sk_live_secret"));
        // The row itself also skips the key when serialized directly
        let json = serde_json::to_string(&client).unwrap();
        assert!(!json.contains("sk_live_secret"));
    }

    #[test]
    fn test_client_type_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&ClientType::Booking).unwrap(),
            "\"booking\""
        );
        assert_eq!(
            serde_json::from_str::<ClientType>("\"sales\"").unwrap(),
            ClientType::Sales
        );
    }
}
