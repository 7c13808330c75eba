//! OpenAPI documentation. Served at `/api/openapi.json` and browsable via
//! RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services;
use crewdesk_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Crewdesk API",
        version = "0.1.0",
        description = "Multi-tenant staff onboarding and account provisioning API. Onboarding a staff member writes the local record and, per client type, provisions communication or full application-access accounts in the OmniStack CRM and the identity provider."
    ),
    paths(
        // Staff
        handlers::staff::list_staff,
        handlers::staff::create_staff,
        handlers::staff::get_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,
        // Clients
        handlers::clients::list_clients,
        handlers::clients::get_client,
        // Departments
        handlers::departments::list_departments,
        // OmniStack passthrough
        handlers::omni::list_businesses,
        handlers::omni::list_subscriptions,
        handlers::omni::dashboard_summary,
    ),
    components(schemas(
        models::StaffResponse,
        models::StaffStatus,
        models::CommunicationPreferences,
        models::StaffExternalIds,
        models::ClientResponse,
        models::ClientType,
        models::ClientStatus,
        models::Department,
        models::Page<models::StaffResponse>,
        models::Page<models::ClientResponse>,
        services::CreateStaffRequest,
        services::UpdateStaffRequest,
        error::ErrorResponse,
    )),
    tags(
        (name = "staff", description = "Staff onboarding, updates, and offboarding"),
        (name = "clients", description = "Client (tenant) directory"),
        (name = "departments", description = "Departments within a client"),
        (name = "omni", description = "Read-only OmniStack passthrough")
    )
)]
pub struct ApiDoc;
