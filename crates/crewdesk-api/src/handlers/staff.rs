//! Staff CRUD handlers
//!
//! Create and delete delegate to the provisioning service so external
//! accounts follow the staff row's lifecycle; list/get read straight
//! from the repository.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crewdesk_core::{
    models::{Page, StaffResponse, StaffStatus},
    AppError,
};
use crewdesk_db::StaffFilter;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::{CreateStaffRequest, UpdateStaffRequest};
use crate::state::AppState;

/// Query parameters for listing staff
#[derive(Debug, Deserialize)]
pub struct ListStaffQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub client_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub role: Option<String>,
    pub status: Option<StaffStatus>,
    pub search: Option<String>,
}

/// List staff with filters, search, and pagination
#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "staff",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("client_id" = Option<Uuid>, Query, description = "Filter by owning client"),
        ("department_id" = Option<Uuid>, Query, description = "Filter by department"),
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("status" = Option<String>, Query, description = "Filter by status: active or inactive"),
        ("search" = Option<String>, Query, description = "Free-text search over name, email, and employee id")
    ),
    responses(
        (status = 200, description = "One page of staff", body = Page<StaffResponse>),
        (status = 401, description = "Missing or invalid service key", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query))]
pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListStaffQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = page.saturating_sub(1).saturating_mul(limit);

    let filter = StaffFilter {
        client_id: query.client_id,
        department_id: query.department_id,
        role: query.role,
        status: query.status,
        search: query.search,
    };

    let rows = state
        .db
        .staff_repository
        .list_staff(&filter, limit, offset)
        .await
        .map_err(HttpAppError::from)?;
    let total = state
        .db
        .staff_repository
        .count_staff(&filter)
        .await
        .map_err(HttpAppError::from)?;

    let items: Vec<StaffResponse> = rows.into_iter().map(StaffResponse::from).collect();
    Ok(Json(Page::new(items, total, page, limit)))
}

/// Onboard a staff member
#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 200, description = "Staff onboarded", body = StaffResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Client or department not found", body = ErrorResponse),
        (status = 409, description = "Staff with this email already exists", body = ErrorResponse),
        (status = 422, description = "Client integration not configured", body = ErrorResponse),
        (status = 502, description = "Upstream gateway failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(client_id = %request.client_id))]
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateStaffRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = state
        .provisioning
        .create_staff(request)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(response))
}

/// Get a single staff member by ID
#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff found", body = StaffResponse),
        (status = 404, description = "Staff not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let staff = state
        .db
        .staff_repository
        .get_staff(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Staff {} not found", id))))?;
    Ok(Json(StaffResponse::from(staff)))
}

/// Update a staff member. Communication preference changes are mirrored
/// onto the matching user record.
#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Staff updated", body = StaffResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Staff or department not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateStaffRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = state
        .provisioning
        .update_staff(id, request)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(response))
}

/// Offboard a staff member. External cleanup is best effort.
#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff deleted"),
        (status = 404, description = "Staff not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .provisioning
        .delete_staff(id)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(json!({ "message": "Staff deleted", "id": id })))
}
