//! Crewdesk HTTP API: staff onboarding, account provisioning, and the
//! read-only OmniStack passthroughs behind the admin dashboard.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
