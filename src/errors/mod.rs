//! Application error types
//!
//! This module defines the top-level error type shared by REST handlers
//! and server startup code. Provider and storage errors carry their own
//! error enums and convert into `AppError` at the handler boundary.

pub mod app_error;

pub use app_error::{AppError, AppResult};
