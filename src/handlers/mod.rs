//! HTTP and WebSocket request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check and call inspection endpoints
//! - `call` - Speech-to-speech call WebSocket

pub mod api;
pub mod call;

// Re-export commonly used handlers for convenient access
pub use call::call_handler;
