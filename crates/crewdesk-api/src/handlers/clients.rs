//! Client (tenant) read handlers. Clients are managed out of band; the API
//! only lists them and reports whether their OmniStack integration is
//! configured.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crewdesk_core::{
    models::{ClientResponse, Page},
    AppError,
};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Query parameters for listing clients
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// List clients with optional name search
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "clients",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("search" = Option<String>, Query, description = "Filter by client name")
    ),
    responses(
        (status = 200, description = "One page of clients", body = Page<ClientResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query))]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListClientsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let search = query.search.as_deref();

    let clients = state
        .db
        .client_repository
        .list_clients(search, limit, offset)
        .await
        .map_err(HttpAppError::from)?;
    let total = state
        .db
        .client_repository
        .count_clients(search)
        .await
        .map_err(HttpAppError::from)?;

    let items: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();
    Ok(Json(Page::new(items, total, page, limit)))
}

/// Get a single client by ID
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let client = state
        .db
        .client_repository
        .get_client(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Client {} not found", id))))?;
    Ok(Json(ClientResponse::from(client)))
}
