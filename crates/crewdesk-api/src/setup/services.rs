//! Application state construction

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crewdesk_core::Config;
use crewdesk_gateway::{CrmGateway, IdentityProvider, OmniStackClient, SupabaseAdminClient};

use crate::services::ProvisioningService;
use crate::state::{AppState, DbState, GatewayState};

/// Build application state with the production HTTP gateway clients.
pub fn build_state(config: &Config, pool: PgPool) -> Result<Arc<AppState>, anyhow::Error> {
    let timeout = Duration::from_secs(config.gateway_timeout_seconds);
    let crm: Arc<dyn CrmGateway> =
        Arc::new(OmniStackClient::new(config.omnistack_base_url.clone(), timeout)?);
    let identity: Arc<dyn IdentityProvider> = Arc::new(SupabaseAdminClient::new(
        config.identity_base_url.clone(),
        config.identity_service_key.clone(),
        timeout,
    )?);
    Ok(build_state_with_gateways(config, pool, crm, identity))
}

/// Build application state around caller-supplied gateways. Tests use this
/// to swap in in-process fakes.
pub fn build_state_with_gateways(
    config: &Config,
    pool: PgPool,
    crm: Arc<dyn CrmGateway>,
    identity: Arc<dyn IdentityProvider>,
) -> Arc<AppState> {
    let db = DbState::new(pool.clone());
    let gateways = GatewayState {
        crm: crm.clone(),
        identity: identity.clone(),
    };
    let provisioning = ProvisioningService::new(pool, crm, identity);
    Arc::new(AppState {
        db,
        gateways,
        provisioning,
        config: config.clone(),
    })
}
