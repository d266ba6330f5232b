// Public API - what other modules can use
pub use handlers::{begin_login, complete_login, logout, OAUTH_STATE_COOKIE};
pub use provider::{
    AuthorizationRequest, GoogleProvider, IdentityProvider, ProviderProfile, LOGIN_SCOPE,
};

use axum::{middleware, routing::get, Router};

use crate::{session::ensure_guest, shared::AppState};

/// Routes under /auth. Starting a login is for guests only.
pub fn router() -> Router<AppState> {
    let guest_only = Router::new()
        .route("/auth/google", get(begin_login))
        .route_layer(middleware::from_fn(ensure_guest));

    Router::new()
        .merge(guest_only)
        .route("/auth/google/callback", get(complete_login))
        .route("/auth/logout", get(logout))
}

// Internal modules
mod handlers;
mod provider;
