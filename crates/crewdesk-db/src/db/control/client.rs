use crewdesk_core::{models::Client, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for client (tenant) records. Read-only from the API's point
/// of view; clients are managed out of band.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get client by ID
    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "select", db.record_id = %id))]
    pub async fn get_client(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<Postgres, Client>(
            "SELECT id, name, client_type, omni_gateway_api_key, status, created_at, updated_at \
             FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// List clients with optional name search
    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "select"))]
    pub async fn list_clients(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<Postgres, Client>(
            "SELECT id, name, client_type, omni_gateway_api_key, status, created_at, updated_at \
             FROM clients \
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
             ORDER BY name ASC \
             LIMIT $2 OFFSET $3",
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Count clients matching the same filter as `list_clients`
    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "select"))]
    pub async fn count_clients(&self, search: Option<&str>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM clients WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
