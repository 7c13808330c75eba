use chrono::NaiveDate;
use crewdesk_core::{
    models::{
        CommunicationPreferences, Staff, StaffExternalIds, StaffStatus, StaffWithNames,
    },
    AppError,
};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::map_unique_violation;

/// Fields required to insert a staff row.
#[derive(Debug, Clone)]
pub struct NewStaff {
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
    pub communication_preferences: CommunicationPreferences,
    pub notes: Option<String>,
}

/// Partial update for a staff row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct StaffPatch {
    pub department_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub sub_role: Option<String>,
    pub date_of_join: Option<NaiveDate>,
    pub communication_preferences: Option<CommunicationPreferences>,
    pub notes: Option<String>,
    pub status: Option<StaffStatus>,
}

/// Filters for the staff list endpoint.
#[derive(Debug, Clone, Default)]
pub struct StaffFilter {
    pub client_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub role: Option<String>,
    pub status: Option<StaffStatus>,
    /// Free-text search across name, email, and employee id.
    pub search: Option<String>,
}

const STAFF_COLUMNS: &str = "id, client_id, department_id, employee_id, first_name, last_name, \
     email, phone, role, sub_role, date_of_join, communication_preferences, external_ids, \
     notes, status, created_at, updated_at";

/// Repository for staff records
#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a staff row inside an open transaction. A duplicate
    /// (client_id, email) surfaces as a Conflict.
    #[tracing::instrument(skip(self, tx, new_staff), fields(db.table = "staff", db.operation = "insert"))]
    pub async fn create_staff_tx(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        new_staff: &NewStaff,
    ) -> Result<Staff, AppError> {
        let staff = sqlx::query_as::<Postgres, Staff>(&format!(
            "INSERT INTO staff (client_id, department_id, employee_id, first_name, last_name, \
             email, phone, role, sub_role, date_of_join, communication_preferences, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {}",
            STAFF_COLUMNS
        ))
        .bind(new_staff.client_id)
        .bind(new_staff.department_id)
        .bind(&new_staff.employee_id)
        .bind(&new_staff.first_name)
        .bind(&new_staff.last_name)
        .bind(&new_staff.email)
        .bind(&new_staff.phone)
        .bind(&new_staff.role)
        .bind(&new_staff.sub_role)
        .bind(new_staff.date_of_join)
        .bind(Json(&new_staff.communication_preferences))
        .bind(&new_staff.notes)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_unique_violation(e, "Staff with this email already exists for client"))?;

        Ok(staff)
    }

    /// Stamp external identity references (and optionally append a
    /// provisioning note) inside an open transaction.
    #[tracing::instrument(skip(self, tx, external_ids), fields(db.table = "staff", db.operation = "update", db.record_id = %staff_id))]
    pub async fn stamp_external_ids_tx(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        staff_id: Uuid,
        external_ids: &StaffExternalIds,
        note: Option<&str>,
    ) -> Result<Staff, AppError> {
        let staff = sqlx::query_as::<Postgres, Staff>(&format!(
            "UPDATE staff SET external_ids = $2, \
             notes = CASE WHEN $3::text IS NULL THEN notes \
                          WHEN notes IS NULL THEN $3 \
                          ELSE notes || E'\\n' || $3 END, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            STAFF_COLUMNS
        ))
        .bind(staff_id)
        .bind(Json(external_ids))
        .bind(note)
        .fetch_one(&mut **tx)
        .await?;

        Ok(staff)
    }

    /// Get staff by ID with client/department display names
    #[tracing::instrument(skip(self), fields(db.table = "staff", db.operation = "select", db.record_id = %id))]
    pub async fn get_staff(&self, id: Uuid) -> Result<Option<StaffWithNames>, AppError> {
        let staff = sqlx::query_as::<Postgres, StaffWithNames>(
            "SELECT s.*, c.name AS client_name, d.name AS department_name \
             FROM staff s \
             JOIN clients c ON c.id = s.client_id \
             LEFT JOIN departments d ON d.id = s.department_id \
             WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// List staff with filters, search, and pagination
    #[tracing::instrument(skip(self), fields(db.table = "staff", db.operation = "select"))]
    pub async fn list_staff(
        &self,
        filter: &StaffFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StaffWithNames>, AppError> {
        let staff = sqlx::query_as::<Postgres, StaffWithNames>(
            "SELECT s.*, c.name AS client_name, d.name AS department_name \
             FROM staff s \
             JOIN clients c ON c.id = s.client_id \
             LEFT JOIN departments d ON d.id = s.department_id \
             WHERE ($1::uuid IS NULL OR s.client_id = $1) \
               AND ($2::uuid IS NULL OR s.department_id = $2) \
               AND ($3::text IS NULL OR s.role = $3) \
               AND ($4::staff_status IS NULL OR s.status = $4) \
               AND ($5::text IS NULL \
                    OR s.first_name ILIKE '%' || $5 || '%' \
                    OR s.last_name ILIKE '%' || $5 || '%' \
                    OR s.email ILIKE '%' || $5 || '%' \
                    OR s.employee_id ILIKE '%' || $5 || '%') \
             ORDER BY s.created_at DESC \
             LIMIT $6 OFFSET $7",
        )
        .bind(filter.client_id)
        .bind(filter.department_id)
        .bind(&filter.role)
        .bind(filter.status)
        .bind(&filter.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Count staff matching the same filters as `list_staff`
    #[tracing::instrument(skip(self), fields(db.table = "staff", db.operation = "select"))]
    pub async fn count_staff(&self, filter: &StaffFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM staff s \
             WHERE ($1::uuid IS NULL OR s.client_id = $1) \
               AND ($2::uuid IS NULL OR s.department_id = $2) \
               AND ($3::text IS NULL OR s.role = $3) \
               AND ($4::staff_status IS NULL OR s.status = $4) \
               AND ($5::text IS NULL \
                    OR s.first_name ILIKE '%' || $5 || '%' \
                    OR s.last_name ILIKE '%' || $5 || '%' \
                    OR s.email ILIKE '%' || $5 || '%' \
                    OR s.employee_id ILIKE '%' || $5 || '%')",
        )
        .bind(filter.client_id)
        .bind(filter.department_id)
        .bind(&filter.role)
        .bind(filter.status)
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Apply a partial update. `None` fields are left unchanged.
    #[tracing::instrument(skip(self, patch), fields(db.table = "staff", db.operation = "update", db.record_id = %id))]
    pub async fn update_staff(&self, id: Uuid, patch: &StaffPatch) -> Result<Staff, AppError> {
        let staff = sqlx::query_as::<Postgres, Staff>(&format!(
            "UPDATE staff SET \
             department_id = COALESCE($2, department_id), \
             first_name = COALESCE($3, first_name), \
             last_name = COALESCE($4, last_name), \
             phone = COALESCE($5, phone), \
             role = COALESCE($6, role), \
             sub_role = COALESCE($7, sub_role), \
             date_of_join = COALESCE($8, date_of_join), \
             communication_preferences = COALESCE($9, communication_preferences), \
             notes = COALESCE($10, notes), \
             status = COALESCE($11, status), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            STAFF_COLUMNS
        ))
        .bind(id)
        .bind(patch.department_id)
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .bind(&patch.phone)
        .bind(&patch.role)
        .bind(&patch.sub_role)
        .bind(patch.date_of_join)
        .bind(patch.communication_preferences.as_ref().map(Json))
        .bind(&patch.notes)
        .bind(patch.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Delete staff row
    #[tracing::instrument(skip(self), fields(db.table = "staff", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_staff(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
