//! Workflow services sitting between the HTTP handlers and repositories.

pub mod provisioning;

pub use provisioning::{
    select_policy, CreateStaffRequest, ProvisioningPolicy, ProvisioningService,
    UpdateStaffRequest,
};
