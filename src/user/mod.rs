// Public API - what other modules can use
pub use models::{UserModel, UserSummary};
pub use service::UserService;

// Internal modules
pub mod models;
pub mod repository;
mod service;
