//! HTTP request handlers

pub mod clients;
pub mod departments;
pub mod omni;
pub mod staff;
