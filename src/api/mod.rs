//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - HTML pages for the catalog and the back office
//! - JSON handlers under `/api`
//! - Cookie sessions, middleware and extractors
//! - Route definitions

pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
