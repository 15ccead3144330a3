//! FlamesBlue - HRIS+ERP backend
//!
//! This library provides token authentication, role-gated access and
//! record storage for the HR/ERP API served by the `flamesblue` binary.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod records;
pub mod security;
pub mod security_logger;
pub mod seed;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
pub use error::{HrisError, Result};
