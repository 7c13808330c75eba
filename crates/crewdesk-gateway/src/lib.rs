//! Crewdesk gateway adapters: OmniStack CRM and the identity provider.
//!
//! Both collaborators are consumed through trait seams so the provisioning
//! workflow can be exercised against in-process fakes.

pub mod error;
pub mod identity;
pub mod omnistack;

pub use error::GatewayError;
pub use identity::{IdentityProvider, IdentityUser, SupabaseAdminClient};
pub use omnistack::{CrmCreateUser, CrmGateway, CrmUser, ListQuery, OmniStackClient};
