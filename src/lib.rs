// Library crate for the story sharing server
// This file exposes the public API for integration tests

pub mod auth;
pub mod config;
pub mod index;
pub mod router;
pub mod session;
pub mod shared;
pub mod story;
pub mod user;
pub mod view;

// Re-export commonly used types for easier access in tests
pub use auth::{AuthorizationRequest, IdentityProvider, ProviderProfile};
pub use config::AppConfig;
pub use router::{build_app, build_router};
pub use shared::{AppError, AppState};
pub use story::{StoryModel, StoryStatus};
pub use view::View;
