//! Route configuration
//!
//! Routers are assembled here and merged in main.rs, where state,
//! CORS, and security header layers are applied.

pub mod api;
pub mod call;

pub use api::create_api_router;
pub use call::create_call_router;
