//! Database repositories for data access layer
//!
//! Repositories are organized into control/ (clients, departments) and
//! people/ (staff, users). Each repository is responsible for a specific
//! domain entity and provides CRUD operations and specialized queries.
//
// Control repositories (clients, departments)
pub mod control;
//
// People repositories (staff, application users)
pub mod people;
//
// Transaction utilities
pub mod transaction;

pub use control::{ClientRepository, DepartmentRepository};
pub use people::{NewStaff, NewUser, StaffFilter, StaffPatch, StaffRepository, UserRepository};
pub use transaction::with_transaction;

use crewdesk_core::AppError;

/// Map a unique-constraint violation to a Conflict with a domain message;
/// pass every other database error through unchanged.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_unique_violation_passthrough() {
        let err = map_unique_violation(sqlx::Error::PoolClosed, "duplicate");
        assert!(matches!(err, AppError::Database(_)));
    }
}
