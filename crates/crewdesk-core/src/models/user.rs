use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::staff::CommunicationPreferences;

/// Application role carried by a User record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Communication-only account (booking tenants).
    Staff,
    /// Full application access (sales tenants).
    Sales,
}

/// External identities mirrored for a User record. `omnistack` is always
/// present when the row exists; `supabase` only for full-access accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UserExternalIds {
    pub supabase: Option<String>,
    pub omnistack: String,
}

/// User entity: the application-access credential record. Created only when
/// an account-creation branch ran at onboarding. Linked to Staff by
/// `(client_id, email)`, deliberately not by foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub client_id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub supabase_id: Option<String>,
    pub role: UserRole,
    pub external_ids: Json<UserExternalIds>,
    pub communication_preferences: Json<CommunicationPreferences>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serde_is_uppercase() {
        assert_eq!(serde_json::to_string(&UserRole::Staff).unwrap(), "\"STAFF\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"SALES\"").unwrap(),
            UserRole::Sales
        );
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            email: "jane@x.com".to_string(),
            name: "Jane Doe".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            supabase_id: None,
            role: UserRole::Staff,
            external_ids: Json(UserExternalIds {
                supabase: None,
                omnistack: "66f2a1".to_string(),
            }),
            communication_preferences: Json(CommunicationPreferences::default()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("$2b$12$secret"));
        assert!(!json.contains("password_hash"));
    }
}
