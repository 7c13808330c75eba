//! HTTP middleware

pub mod service_key;

pub use service_key::service_key_middleware;
