//! Gateway error taxonomy.
//!
//! Failures talking to external collaborators (OmniStack CRM, identity
//! provider). Converted to `AppError::Gateway` at the API boundary.

use crewdesk_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} returned an unexpected payload: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    #[error("{service} is not configured: {message}")]
    NotConfigured {
        service: &'static str,
        message: String,
    },
}

impl GatewayError {
    pub fn service(&self) -> &'static str {
        match self {
            GatewayError::Request { service, .. } => service,
            GatewayError::Upstream { service, .. } => service,
            GatewayError::InvalidResponse { service, .. } => service,
            GatewayError::NotConfigured { service, .. } => service,
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotConfigured { service, message } => {
                AppError::Configuration(format!("{}: {}", service, message))
            }
            other => AppError::Gateway {
                service: other.service().to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdesk_core::ErrorMetadata;

    #[test]
    fn test_upstream_maps_to_gateway_502() {
        let err = GatewayError::Upstream {
            service: "omnistack",
            status: 500,
            message: "boom".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 502);
        assert_eq!(app.error_code(), "GATEWAY_ERROR");
    }

    #[test]
    fn test_not_configured_maps_to_configuration_422() {
        let err = GatewayError::NotConfigured {
            service: "identity",
            message: "missing service key".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 422);
    }
}
