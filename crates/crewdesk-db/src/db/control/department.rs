use crewdesk_core::{models::Department, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for departments (client-scoped)
#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get department by ID, scoped to the owning client
    #[tracing::instrument(skip(self), fields(db.table = "departments", db.operation = "select", db.record_id = %id))]
    pub async fn get_department(
        &self,
        client_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Department>, AppError> {
        let department = sqlx::query_as::<Postgres, Department>(
            "SELECT id, client_id, name, description, created_at, updated_at \
             FROM departments WHERE client_id = $1 AND id = $2",
        )
        .bind(client_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(department)
    }

    /// List departments for a client
    #[tracing::instrument(skip(self), fields(db.table = "departments", db.operation = "select"))]
    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<Postgres, Department>(
            "SELECT id, client_id, name, description, created_at, updated_at \
             FROM departments WHERE client_id = $1 ORDER BY name ASC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }
}
