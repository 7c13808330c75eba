//! Domain models shared across crates.

pub mod client;
pub mod department;
pub mod page;
pub mod staff;
pub mod user;

pub use client::{Client, ClientResponse, ClientStatus, ClientType};
pub use department::Department;
pub use page::Page;
pub use staff::{
    generate_employee_id, CommunicationPreferences, Staff, StaffExternalIds, StaffResponse,
    StaffStatus, StaffWithNames,
};
pub use user::{User, UserExternalIds, UserRole};
