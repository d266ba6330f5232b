// Public API - what other modules can use
pub use handlers::{
    create_story, delete_story, list_stories, show_add_form, show_edit_form, show_story,
    update_story,
};
pub use models::{StoryDraft, StoryModel, StoryStatus, StoryWithOwner};
pub use service::{OwnedStory, StoryService};
pub use types::StoryForm;

use axum::{middleware, routing::get, Router};

use crate::{session::ensure_auth, shared::AppState};

/// Routes under /stories, all behind the authentication guard
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stories", get(list_stories).post(create_story))
        .route("/stories/add", get(show_add_form))
        .route("/stories/edit/:id", get(show_edit_form))
        .route(
            "/stories/:id",
            get(show_story).put(update_story).delete(delete_story),
        )
        .route_layer(middleware::from_fn(ensure_auth))
}

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
