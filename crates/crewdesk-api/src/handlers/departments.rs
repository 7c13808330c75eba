//! Department read handlers.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crewdesk_core::models::Department;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Query parameters for listing departments
#[derive(Debug, Deserialize)]
pub struct ListDepartmentsQuery {
    pub client_id: Uuid,
}

/// List departments for a client
#[utoipa::path(
    get,
    path = "/api/departments",
    tag = "departments",
    params(
        ("client_id" = Uuid, Query, description = "Owning client ID")
    ),
    responses(
        (status = 200, description = "Departments for the client", body = Vec<Department>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDepartmentsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let departments = state
        .db
        .department_repository
        .list_by_client(query.client_id)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(departments))
}
