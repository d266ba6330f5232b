// Public API - what other modules can use
pub use guard::{
    require_authenticated, require_guest, CurrentUser, GuardDecision, RequestContext,
};
pub use middleware::{ensure_auth, ensure_guest, load_session};
pub use types::SessionClaims;

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "storybook_session";

// Internal modules
pub mod cleanup_task;
pub mod guard;
mod middleware;
pub mod models;
pub mod repository;
pub mod service;
pub mod token;
mod types;
