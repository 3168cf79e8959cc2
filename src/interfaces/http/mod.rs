//! HTTP REST API interfaces
//!
//! - `error`: domain-to-HTTP error mapping
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with OpenAPI documentation

pub mod error;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiState};
