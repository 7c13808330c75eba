//! API-wide constants

/// URL prefix for all resource routes
pub const API_PREFIX: &str = "/api";

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Request body size cap, in bytes
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
