//! HTTP middleware.

mod auth;
mod rate_limit;
mod site_gate;

pub use auth::{admin_session_middleware, api_auth_middleware, require_admin, CurrentUser};
pub use rate_limit::{client_identifier, login_rate_limit_middleware, RateLimitError};
pub use site_gate::{site_gate_middleware, SITE_PASSWORD_PATH};
