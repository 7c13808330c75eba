//! Shared application state passed to handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crewdesk_core::Config;
use crewdesk_db::{ClientRepository, DepartmentRepository, StaffRepository, UserRepository};
use crewdesk_gateway::{CrmGateway, IdentityProvider};

use crate::services::ProvisioningService;

/// Database pool and repositories.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub client_repository: ClientRepository,
    pub department_repository: DepartmentRepository,
    pub staff_repository: StaffRepository,
    pub user_repository: UserRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            client_repository: ClientRepository::new(pool.clone()),
            department_repository: DepartmentRepository::new(pool.clone()),
            staff_repository: StaffRepository::new(pool.clone()),
            user_repository: UserRepository::new(pool.clone()),
            pool,
        }
    }
}

/// External gateway clients, behind trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct GatewayState {
    pub crm: Arc<dyn CrmGateway>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub gateways: GatewayState,
    pub provisioning: ProvisioningService,
    pub config: Config,
}
