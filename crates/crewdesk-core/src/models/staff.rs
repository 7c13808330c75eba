use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Staff status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[sqlx(type_name = "staff_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    Active,
    Inactive,
}

/// Per-staff communication channel preferences, stored as jsonb.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CommunicationPreferences {
    pub email: bool,
    pub sms: bool,
}

impl Default for CommunicationPreferences {
    fn default() -> Self {
        CommunicationPreferences {
            email: true,
            sms: false,
        }
    }
}

/// References to records this staff member owns in external systems,
/// stored as jsonb. `omnistack` is stamped after the CRM create call;
/// `supabase` only when full application access was provisioned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct StaffExternalIds {
    pub omnistack: Option<String>,
    pub supabase: Option<String>,
}

/// Staff entity: the HR/organizational record. Owned by a client; at most
/// one application-access User record corresponds to it (matched by email).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub client_id: Uuid,
    pub department_id: Option<Uuid>,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub sub_role: Option<String>,
    pub date_of_join: NaiveDate,
    pub communication_preferences: Json<CommunicationPreferences>,
    pub external_ids: Json<StaffExternalIds>,
    pub notes: Option<String>,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Staff row joined with client/department display names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffWithNames {
    #[sqlx(flatten)]
    pub staff: Staff,
    pub client_name: String,
    pub department_name: Option<String>,
}

/// Staff shape returned over the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: Option<String>,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub sub_role: Option<String>,
    pub date_of_join: NaiveDate,
    pub communication_preferences: CommunicationPreferences,
    pub external_ids: StaffExternalIds,
    pub notes: Option<String>,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaffResponse {
    pub fn from_staff(
        staff: Staff,
        client_name: Option<String>,
        department_name: Option<String>,
    ) -> Self {
        StaffResponse {
            id: staff.id,
            client_id: staff.client_id,
            client_name,
            department_id: staff.department_id,
            department_name,
            employee_id: staff.employee_id,
            first_name: staff.first_name,
            last_name: staff.last_name,
            email: staff.email,
            phone: staff.phone,
            role: staff.role,
            sub_role: staff.sub_role,
            date_of_join: staff.date_of_join,
            communication_preferences: staff.communication_preferences.0,
            external_ids: staff.external_ids.0,
            notes: staff.notes,
            status: staff.status,
            created_at: staff.created_at,
            updated_at: staff.updated_at,
        }
    }
}

impl From<StaffWithNames> for StaffResponse {
    fn from(row: StaffWithNames) -> Self {
        let client_name = Some(row.client_name);
        StaffResponse::from_staff(row.staff, client_name, row.department_name)
    }
}

const EMPLOYEE_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const EMPLOYEE_ID_LEN: usize = 6;

/// Generate an employee id of the form `EMP-XXXXXX` (uppercase alphanumerics).
pub fn generate_employee_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..EMPLOYEE_ID_LEN)
        .map(|_| EMPLOYEE_ID_ALPHABET[rng.random_range(0..EMPLOYEE_ID_ALPHABET.len())] as char)
        .collect();
    format!("EMP-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_id_format() {
        let re = regex::Regex::new(r"^EMP-[A-Z0-9]{6}$").unwrap();
        for _ in 0..100 {
            let id = generate_employee_id();
            assert!(re.is_match(&id), "unexpected employee id: {}", id);
        }
    }

    #[test]
    fn test_communication_preferences_default() {
        let prefs = CommunicationPreferences::default();
        assert!(prefs.email);
        assert!(!prefs.sms);
    }

    #[test]
    fn test_external_ids_roundtrip() {
        let ids = StaffExternalIds {
            omnistack: Some("66f2a1".to_string()),
            supabase: None,
        };
        let json = serde_json::to_value(&ids).unwrap();
        assert_eq!(json["omnistack"], "66f2a1");
        assert!(json["supabase"].is_null());
        let back: StaffExternalIds = serde_json::from_value(json).unwrap();
        assert_eq!(back, ids);
    }
}
