pub mod staff;
pub mod user;

pub use staff::{NewStaff, StaffFilter, StaffPatch, StaffRepository};
pub use user::{NewUser, UserRepository};
