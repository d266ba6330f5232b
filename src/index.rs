use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, instrument};

use crate::{
    session::{ensure_auth, ensure_guest, CurrentUser},
    shared::{AppError, AppState},
    story::StoryService,
    user::UserSummary,
    view::View,
};

/// Landing page and dashboard
pub fn router() -> Router<AppState> {
    let guest_only = Router::new()
        .route("/", get(landing))
        .route_layer(middleware::from_fn(ensure_guest));
    let authenticated = Router::new()
        .route("/dashboard", get(dashboard))
        .route_layer(middleware::from_fn(ensure_auth));

    guest_only.merge(authenticated)
}

/// GET /
/// Login page for anonymous visitors
pub async fn landing() -> View {
    View::new("login", json!({}))
}

/// GET /dashboard
/// The caller's own stories, private ones included, newest first
#[instrument(name = "dashboard", skip(state), fields(user_id = %user.user_id))]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    match load_dashboard(&state, &user).await {
        Ok(view) => view.into_response(),
        Err(e) => {
            error!(error = %e, "Dashboard failed to load");
            View::server_error().into_response()
        }
    }
}

async fn load_dashboard(state: &AppState, user: &CurrentUser) -> Result<View, AppError> {
    let owner = state
        .user_repository
        .get_user(user.user_id)
        .await?
        .as_ref()
        .map(UserSummary::from);

    let stories = StoryService::new(
        Arc::clone(&state.story_repository),
        Arc::clone(&state.user_repository),
    )
    .list_for_owner(user.user_id)
    .await?;

    Ok(View::new(
        "dashboard",
        json!({
            "name": owner.as_ref().map(|o| o.display_name.as_str()),
            "user": owner,
            "stories": stories,
        }),
    ))
}
