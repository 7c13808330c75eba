//! Service-to-service API key check.
//!
//! The whole `/api` surface is protected by a single bearer key intended
//! for the admin frontend's backend channel. When no key is configured,
//! the check is a no-op (local development).

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crewdesk_core::AppError;

use crate::error::HttpAppError;

pub async fn service_key_middleware(
    State(expected): State<Arc<Option<String>>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = expected.as_ref() {
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match provided {
            Some(key) if key == expected => {}
            _ => {
                return HttpAppError(AppError::Unauthorized(
                    "Missing or invalid service API key".to_string(),
                ))
                .into_response();
            }
        }
    }

    next.run(request).await
}
