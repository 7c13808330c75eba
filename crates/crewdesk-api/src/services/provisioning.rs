//! Staff onboarding and account provisioning.
//!
//! Onboarding a staff member writes the local staff row and, depending on
//! the owning client's type and the request, provisions external accounts:
//!
//! - booking clients: a communication-only account (OmniStack user + local
//!   User row with role STAFF), when a password is supplied and the client
//!   has an OmniStack API key
//! - sales clients: full application access (identity login + OmniStack
//!   user + local User row with role SALES), when app access is requested
//!   and a password is supplied
//! - otherwise: the staff row only
//!
//! All local writes happen inside one transaction. A failed gateway call
//! rolls everything back, so an onboarding either fully completes its
//! branch or leaves no local rows behind. External records created before
//! the failure are not compensated; they are orphaned on the remote side
//! and keyed by email, so a retry under the same email reuses nothing.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crewdesk_core::{
    models::{
        ClientType, CommunicationPreferences, Staff, StaffExternalIds, StaffResponse, StaffStatus,
        UserExternalIds, UserRole,
    },
    AppError,
};
use crewdesk_db::{
    db::transaction::with_transaction, ClientRepository, DepartmentRepository, NewStaff, NewUser,
    StaffPatch, StaffRepository, UserRepository,
};
use crewdesk_gateway::{CrmCreateUser, CrmGateway, IdentityProvider};

fn default_role() -> String {
    "staff".to_string()
}

/// Onboarding request body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStaffRequest {
    pub client_id: Uuid,
    pub department_id: Option<Uuid>,
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub phone: Option<String>,
    /// When present, an account-creation branch may run.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    /// Request full application access (sales clients only).
    #[serde(default)]
    pub can_access_app: bool,
    #[serde(default = "default_role")]
    pub role: String,
    pub sub_role: Option<String>,
    pub date_of_join: NaiveDate,
    pub communication_preferences: Option<CommunicationPreferences>,
    pub notes: Option<String>,
}

/// Partial update body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStaffRequest {
    pub department_id: Option<Uuid>,
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub sub_role: Option<String>,
    pub date_of_join: Option<NaiveDate>,
    pub communication_preferences: Option<CommunicationPreferences>,
    pub notes: Option<String>,
    pub status: Option<StaffStatus>,
}

/// Which accounts an onboarding will provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningPolicy {
    /// Staff row only, no external accounts.
    RecordOnly,
    /// OmniStack user + communication-only User row (booking clients).
    CommunicationOnly,
    /// Identity login + OmniStack user + full-access User row (sales clients).
    FullAccess,
}

/// Decide the provisioning branch from the client type and request shape.
/// Pure; the caller checks gateway configuration separately where a
/// missing key is an error rather than a silent downgrade.
pub fn select_policy(
    client_type: ClientType,
    can_access_app: bool,
    has_password: bool,
    crm_configured: bool,
) -> ProvisioningPolicy {
    match client_type {
        // Booking staff never get app access. Without a password or a CRM
        // key there is nothing to provision, so the branch degrades to a
        // plain record.
        ClientType::Booking => {
            if has_password && crm_configured {
                ProvisioningPolicy::CommunicationOnly
            } else {
                ProvisioningPolicy::RecordOnly
            }
        }
        ClientType::Sales => {
            if can_access_app && has_password {
                ProvisioningPolicy::FullAccess
            } else {
                ProvisioningPolicy::RecordOnly
            }
        }
    }
}

/// Branch-specific input checks, run before any write.
fn validate_for_policy(
    policy: ProvisioningPolicy,
    request: &CreateStaffRequest,
) -> Result<(), AppError> {
    if policy == ProvisioningPolicy::RecordOnly {
        return Ok(());
    }
    if request.email.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "email is required when provisioning an account".to_string(),
        ));
    }
    let sms_enabled = request
        .communication_preferences
        .as_ref()
        .map(|p| p.sms)
        .unwrap_or(false);
    let has_phone = request
        .phone
        .as_deref()
        .map(|p| !p.trim().is_empty())
        .unwrap_or(false);
    if sms_enabled && !has_phone {
        return Err(AppError::InvalidInput(
            "phone is required when the SMS preference is enabled".to_string(),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Orchestrates the onboarding, update, and offboarding workflows.
#[derive(Clone)]
pub struct ProvisioningService {
    pool: PgPool,
    clients: ClientRepository,
    departments: DepartmentRepository,
    staff: StaffRepository,
    users: UserRepository,
    crm: Arc<dyn CrmGateway>,
    identity: Arc<dyn IdentityProvider>,
}

impl ProvisioningService {
    pub fn new(
        pool: PgPool,
        crm: Arc<dyn CrmGateway>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            departments: DepartmentRepository::new(pool.clone()),
            staff: StaffRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
            crm,
            identity,
        }
    }

    /// Onboard a staff member for a client, provisioning external accounts
    /// per the selected branch. Local writes are transactional; a gateway
    /// failure leaves no staff or user rows behind.
    #[tracing::instrument(skip(self, request), fields(client_id = %request.client_id, email = %request.email))]
    pub async fn create_staff(
        &self,
        request: CreateStaffRequest,
    ) -> Result<StaffResponse, AppError> {
        let client = self
            .clients
            .get_client(request.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", request.client_id)))?;

        if let Some(department_id) = request.department_id {
            self.departments
                .get_department(client.id, department_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Department {} not found for client {}",
                        department_id, client.id
                    ))
                })?;
        }

        let policy = select_policy(
            client.client_type,
            request.can_access_app,
            request.password.is_some(),
            client.omni_gateway_api_key.is_some(),
        );
        validate_for_policy(policy, &request)?;

        // Full access cannot silently degrade: the caller asked for an
        // account, so a missing CRM key is a client configuration problem.
        if policy == ProvisioningPolicy::FullAccess && client.omni_gateway_api_key.is_none() {
            return Err(AppError::Configuration(format!(
                "Client {} has no OmniStack API key configured",
                client.id
            )));
        }

        tracing::info!(policy = ?policy, client_type = ?client.client_type, "Onboarding staff");

        let new_staff = NewStaff {
            client_id: client.id,
            department_id: request.department_id,
            employee_id: crewdesk_core::models::generate_employee_id(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            role: request.role.clone(),
            sub_role: request.sub_role.clone(),
            date_of_join: request.date_of_join,
            communication_preferences: request
                .communication_preferences
                .clone()
                .unwrap_or_default(),
            notes: request.notes.clone(),
        };

        let staff_repo = self.staff.clone();
        let users_repo = self.users.clone();
        let crm = self.crm.clone();
        let identity = self.identity.clone();
        let password = request.password.clone();

        let staff = with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let staff = staff_repo.create_staff_tx(tx, &new_staff).await?;
                match policy {
                    ProvisioningPolicy::RecordOnly => Ok(staff),
                    ProvisioningPolicy::CommunicationOnly => {
                        let password = password.ok_or_else(|| {
                            AppError::Internal("Password missing for provisioning branch".into())
                        })?;
                        let api_key = client.omni_gateway_api_key.as_deref().ok_or_else(|| {
                            AppError::Internal("API key missing for provisioning branch".into())
                        })?;
                        let crm_user = crm
                            .create_user(api_key, &crm_create_payload(&staff, &password))
                            .await?;
                        let user = communication_user(&staff, &password, &crm_user.id, None)?;
                        users_repo.create_user_tx(tx, &user).await?;
                        staff_repo
                            .stamp_external_ids_tx(
                                tx,
                                staff.id,
                                &StaffExternalIds {
                                    omnistack: Some(crm_user.id),
                                    supabase: None,
                                },
                                Some("Communication account provisioned via OmniStack"),
                            )
                            .await
                    }
                    ProvisioningPolicy::FullAccess => {
                        let password = password.ok_or_else(|| {
                            AppError::Internal("Password missing for provisioning branch".into())
                        })?;
                        let api_key = client.omni_gateway_api_key.as_deref().ok_or_else(|| {
                            AppError::Internal("API key missing for provisioning branch".into())
                        })?;
                        let identity_user = identity.create_user(&staff.email, &password).await?;
                        let crm_user = crm
                            .create_user(api_key, &crm_create_payload(&staff, &password))
                            .await?;
                        let user = communication_user(
                            &staff,
                            &password,
                            &crm_user.id,
                            Some(identity_user.id.clone()),
                        )?;
                        users_repo.create_user_tx(tx, &user).await?;
                        staff_repo
                            .stamp_external_ids_tx(
                                tx,
                                staff.id,
                                &StaffExternalIds {
                                    omnistack: Some(crm_user.id),
                                    supabase: Some(identity_user.id),
                                },
                                Some("Application access provisioned"),
                            )
                            .await
                    }
                }
            })
        })
        .await?;

        tracing::info!(staff_id = %staff.id, employee_id = %staff.employee_id, "Staff onboarded");

        // Names come from a follow-up read so the response matches GET
        let with_names = self
            .staff
            .get_staff(staff.id)
            .await?
            .ok_or_else(|| AppError::Internal("Staff row missing after onboarding".to_string()))?;
        Ok(StaffResponse::from(with_names))
    }

    /// Update a staff row. When the communication preferences change, the
    /// change is mirrored onto the matching User record outside the update
    /// transaction; staff without an account have nothing to sync.
    #[tracing::instrument(skip(self, request), fields(staff_id = %id))]
    pub async fn update_staff(
        &self,
        id: Uuid,
        request: UpdateStaffRequest,
    ) -> Result<StaffResponse, AppError> {
        let existing = self
            .staff
            .get_staff(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff {} not found", id)))?;

        if let Some(department_id) = request.department_id {
            self.departments
                .get_department(existing.staff.client_id, department_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Department {} not found for client {}",
                        department_id, existing.staff.client_id
                    ))
                })?;
        }

        let prefs_changed = request
            .communication_preferences
            .as_ref()
            .map(|p| *p != existing.staff.communication_preferences.0)
            .unwrap_or(false);

        let patch = StaffPatch {
            department_id: request.department_id,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            role: request.role,
            sub_role: request.sub_role,
            date_of_join: request.date_of_join,
            communication_preferences: request.communication_preferences.clone(),
            notes: request.notes,
            status: request.status,
        };
        let updated = self.staff.update_staff(id, &patch).await?;

        if prefs_changed {
            if let Some(prefs) = &request.communication_preferences {
                let synced = self
                    .users
                    .sync_communication_preferences(updated.client_id, &updated.email, prefs)
                    .await?;
                if synced.is_none() {
                    tracing::debug!(staff_id = %id, "No user record to mirror preferences onto");
                }
            }
        }

        let with_names = self
            .staff
            .get_staff(id)
            .await?
            .ok_or_else(|| AppError::Internal("Staff row missing after update".to_string()))?;
        Ok(StaffResponse::from(with_names))
    }

    /// Offboard a staff member. External cleanup (OmniStack user, local
    /// User row) is best effort: failures are logged and the local staff
    /// row is still removed. Orphaned remote records are reconciled out
    /// of band.
    #[tracing::instrument(skip(self), fields(staff_id = %id))]
    pub async fn delete_staff(&self, id: Uuid) -> Result<(), AppError> {
        let existing = self
            .staff
            .get_staff(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff {} not found", id)))?;
        let staff = existing.staff;

        if let Some(omni_id) = staff.external_ids.0.omnistack.as_deref() {
            match self.clients.get_client(staff.client_id).await {
                Ok(Some(client)) => {
                    if let Some(api_key) = client.omni_gateway_api_key.as_deref() {
                        if let Err(e) = self.crm.delete_user(api_key, omni_id).await {
                            tracing::warn!(staff_id = %id, error = %e, "OmniStack user cleanup failed; continuing");
                        }
                    } else {
                        tracing::warn!(staff_id = %id, "Staff has an OmniStack id but the client has no API key");
                    }
                }
                Ok(None) => {
                    tracing::warn!(staff_id = %id, "Owning client no longer exists; skipping CRM cleanup");
                }
                Err(e) => {
                    tracing::warn!(staff_id = %id, error = %e, "Failed to load client for CRM cleanup; continuing");
                }
            }
        }

        if let Err(e) = self
            .users
            .delete_by_email(staff.client_id, &staff.email)
            .await
        {
            tracing::warn!(staff_id = %id, error = %e, "User record cleanup failed; continuing");
        }

        self.staff.delete_staff(id).await?;
        tracing::info!(staff_id = %id, "Staff offboarded");
        Ok(())
    }
}

fn crm_create_payload(staff: &Staff, password: &str) -> CrmCreateUser {
    CrmCreateUser {
        name: staff.first_name.clone(),
        surname: staff.last_name.clone(),
        email: staff.email.clone(),
        password: password.to_string(),
        registration_source: "manual".to_string(),
        external_ids: json!({ "crewdesk": staff.id }),
    }
}

fn communication_user(
    staff: &Staff,
    password: &str,
    omnistack_id: &str,
    supabase_id: Option<String>,
) -> Result<NewUser, AppError> {
    let role = if supabase_id.is_some() {
        UserRole::Sales
    } else {
        UserRole::Staff
    };
    Ok(NewUser {
        client_id: staff.client_id,
        email: staff.email.clone(),
        name: format!("{} {}", staff.first_name, staff.last_name),
        password_hash: hash_password(password)?,
        supabase_id: supabase_id.clone(),
        role,
        external_ids: UserExternalIds {
            supabase: supabase_id,
            omnistack: omnistack_id.to_string(),
        },
        communication_preferences: staff.communication_preferences.0.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: Option<&str>, can_access_app: bool) -> CreateStaffRequest {
        CreateStaffRequest {
            client_id: Uuid::new_v4(),
            department_id: None,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            password: password.map(String::from),
            can_access_app,
            role: "staff".to_string(),
            sub_role: None,
            date_of_join: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            communication_preferences: None,
            notes: None,
        }
    }

    #[test]
    fn test_booking_with_password_and_key_is_communication_only() {
        let policy = select_policy(ClientType::Booking, false, true, true);
        assert_eq!(policy, ProvisioningPolicy::CommunicationOnly);
    }

    #[test]
    fn test_booking_without_key_degrades_to_record_only() {
        let policy = select_policy(ClientType::Booking, false, true, false);
        assert_eq!(policy, ProvisioningPolicy::RecordOnly);
    }

    #[test]
    fn test_booking_never_gets_full_access() {
        // can_access_app is ignored for booking clients
        let policy = select_policy(ClientType::Booking, true, true, true);
        assert_eq!(policy, ProvisioningPolicy::CommunicationOnly);
    }

    #[test]
    fn test_sales_with_app_access_and_password_is_full_access() {
        let policy = select_policy(ClientType::Sales, true, true, true);
        assert_eq!(policy, ProvisioningPolicy::FullAccess);
    }

    #[test]
    fn test_sales_without_password_is_record_only() {
        let policy = select_policy(ClientType::Sales, true, false, true);
        assert_eq!(policy, ProvisioningPolicy::RecordOnly);
    }

    #[test]
    fn test_sales_without_app_access_is_record_only() {
        let policy = select_policy(ClientType::Sales, false, true, true);
        assert_eq!(policy, ProvisioningPolicy::RecordOnly);
    }

    #[test]
    fn test_validation_requires_email_for_account_branches() {
        let mut req = request(Some("s3cretpass"), false);
        req.email = "  ".to_string();
        let err = validate_for_policy(ProvisioningPolicy::CommunicationOnly, &req).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_validation_requires_phone_when_sms_enabled() {
        let mut req = request(Some("s3cretpass"), true);
        req.communication_preferences = Some(CommunicationPreferences {
            email: true,
            sms: true,
        });
        let err = validate_for_policy(ProvisioningPolicy::FullAccess, &req).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        req.phone = Some("+15550100".to_string());
        assert!(validate_for_policy(ProvisioningPolicy::FullAccess, &req).is_ok());
    }

    #[test]
    fn test_record_only_skips_branch_validation() {
        let mut req = request(None, false);
        req.email = String::new();
        assert!(validate_for_policy(ProvisioningPolicy::RecordOnly, &req).is_ok());
    }

    #[test]
    fn test_communication_user_roles() {
        let staff = sample_staff();
        let user = communication_user(&staff, "s3cretpass", "omni-1", None).unwrap();
        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.external_ids.omnistack, "omni-1");
        assert!(user.external_ids.supabase.is_none());
        assert_ne!(user.password_hash, "s3cretpass");

        let user =
            communication_user(&staff, "s3cretpass", "omni-1", Some("sb-1".to_string())).unwrap();
        assert_eq!(user.role, UserRole::Sales);
        assert_eq!(user.external_ids.supabase.as_deref(), Some("sb-1"));
        assert_eq!(user.supabase_id.as_deref(), Some("sb-1"));
    }

    fn sample_staff() -> Staff {
        use chrono::Utc;
        use sqlx::types::Json;
        Staff {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            department_id: None,
            employee_id: "EMP-A1B2C3".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            role: "staff".to_string(),
            sub_role: None,
            date_of_join: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            communication_preferences: Json(CommunicationPreferences::default()),
            external_ids: Json(StaffExternalIds::default()),
            notes: None,
            status: StaffStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
