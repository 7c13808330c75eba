pub mod client;
pub mod department;

pub use client::ClientRepository;
pub use department::DepartmentRepository;
