//! Read-only OmniStack passthrough handlers for the admin dashboard.
//!
//! Each request names a client; its stored API key authenticates the
//! upstream call. Responses are forwarded as-is.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crewdesk_core::AppError;
use crewdesk_gateway::ListQuery;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Query parameters for the passthrough listings
#[derive(Debug, Deserialize)]
pub struct OmniQuery {
    pub client_id: Uuid,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl OmniQuery {
    fn to_list_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
            status: self.status.clone(),
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
        }
    }
}

async fn resolve_api_key(state: &AppState, client_id: Uuid) -> Result<String, AppError> {
    let client = state
        .db
        .client_repository
        .get_client(client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client {} not found", client_id)))?;
    client.omni_gateway_api_key.ok_or_else(|| {
        AppError::Configuration(format!(
            "Client {} has no OmniStack API key configured",
            client_id
        ))
    })
}

/// List the client's businesses from OmniStack
#[utoipa::path(
    get,
    path = "/api/omni/businesses",
    tag = "omni",
    params(
        ("client_id" = Uuid, Query, description = "Client whose API key authenticates the call"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("search" = Option<String>, Query, description = "Free-text search"),
        ("status" = Option<String>, Query, description = "Upstream status filter")
    ),
    responses(
        (status = 200, description = "Upstream business listing"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 422, description = "Client integration not configured", body = ErrorResponse),
        (status = 502, description = "Upstream gateway failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(client_id = %query.client_id))]
pub async fn list_businesses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OmniQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let api_key = resolve_api_key(&state, query.client_id)
        .await
        .map_err(HttpAppError::from)?;
    let body = state
        .gateways
        .crm
        .list_businesses(&api_key, &query.to_list_query())
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(body))
}

/// List the client's subscriptions from OmniStack
#[utoipa::path(
    get,
    path = "/api/omni/subscriptions",
    tag = "omni",
    params(
        ("client_id" = Uuid, Query, description = "Client whose API key authenticates the call"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "Upstream status filter"),
        ("from_date" = Option<String>, Query, description = "Start of date range"),
        ("to_date" = Option<String>, Query, description = "End of date range")
    ),
    responses(
        (status = 200, description = "Upstream subscription listing"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 422, description = "Client integration not configured", body = ErrorResponse),
        (status = 502, description = "Upstream gateway failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(client_id = %query.client_id))]
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OmniQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let api_key = resolve_api_key(&state, query.client_id)
        .await
        .map_err(HttpAppError::from)?;
    let body = state
        .gateways
        .crm
        .list_subscriptions(&api_key, &query.to_list_query())
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(body))
}

/// Fetch the client's dashboard summary from OmniStack
#[utoipa::path(
    get,
    path = "/api/omni/dashboard",
    tag = "omni",
    params(
        ("client_id" = Uuid, Query, description = "Client whose API key authenticates the call")
    ),
    responses(
        (status = 200, description = "Upstream dashboard summary"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 422, description = "Client integration not configured", body = ErrorResponse),
        (status = 502, description = "Upstream gateway failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(client_id = %query.client_id))]
pub async fn dashboard_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OmniQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let api_key = resolve_api_key(&state, query.client_id)
        .await
        .map_err(HttpAppError::from)?;
    let body = state
        .gateways
        .crm
        .dashboard_summary(&api_key)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(body))
}
