use crewdesk_core::{
    models::{CommunicationPreferences, User, UserExternalIds, UserRole},
    AppError,
};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::map_unique_violation;

/// Fields required to insert an application-access user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub client_id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub supabase_id: Option<String>,
    pub role: UserRole,
    pub external_ids: UserExternalIds,
    pub communication_preferences: CommunicationPreferences,
}

const USER_COLUMNS: &str = "id, client_id, email, name, password_hash, supabase_id, role, \
     external_ids, communication_preferences, created_at, updated_at";

/// Repository for application-access user records. Linked to staff by
/// (client_id, email), deliberately not by foreign key.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user row inside an open transaction
    #[tracing::instrument(skip(self, tx, new_user), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user_tx(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        new_user: &NewUser,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "INSERT INTO users (client_id, email, name, password_hash, supabase_id, role, \
             external_ids, communication_preferences) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(new_user.client_id)
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(&new_user.supabase_id)
        .bind(new_user.role)
        .bind(Json(&new_user.external_ids))
        .bind(Json(&new_user.communication_preferences))
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_unique_violation(e, "User with this email already exists for client"))?;

        Ok(user)
    }

    /// Find a user by (client_id, email)
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn find_by_email(
        &self,
        client_id: Uuid,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "SELECT {} FROM users WHERE client_id = $1 AND email = $2",
            USER_COLUMNS
        ))
        .bind(client_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update a user's communication preferences, matched by email.
    /// Returns None when no user exists for that email (not all staff
    /// have one).
    #[tracing::instrument(skip(self, prefs), fields(db.table = "users", db.operation = "update"))]
    pub async fn sync_communication_preferences(
        &self,
        client_id: Uuid,
        email: &str,
        prefs: &CommunicationPreferences,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "UPDATE users SET communication_preferences = $3, updated_at = NOW() \
             WHERE client_id = $1 AND email = $2 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(client_id)
        .bind(email)
        .bind(Json(prefs))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user row matched by email. Returns whether a row was removed.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "delete"))]
    pub async fn delete_by_email(&self, client_id: Uuid, email: &str) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM users WHERE client_id = $1 AND email = $2")
            .bind(client_id)
            .bind(email)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
