//! Crewdesk database layer: sqlx repositories and transaction helpers.

pub mod db;

pub use db::{
    with_transaction, ClientRepository, DepartmentRepository, NewStaff, NewUser, StaffFilter,
    StaffPatch, StaffRepository, UserRepository,
};
