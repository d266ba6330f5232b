use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    service::{OwnedStory, StoryService},
    types::StoryForm,
};
use crate::{
    session::{guard::DASHBOARD_PAGE, guard::LANDING_PAGE, CurrentUser},
    shared::{AppError, AppState},
    view::View,
};

const STORIES_PAGE: &str = "/stories";

fn story_service(state: &AppState) -> StoryService {
    StoryService::new(
        Arc::clone(&state.story_repository),
        Arc::clone(&state.user_repository),
    )
}

/// Ids that cannot be parsed cannot name a story either
fn parse_story_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Story {}", raw)))
}

/// Re-renders a form with the submitted values and the validation message
fn invalid_form(
    view: &'static str,
    story_id: Option<Uuid>,
    form: &StoryForm,
    message: String,
) -> Response {
    View::new(
        view,
        json!({ "story_id": story_id, "form": form, "errors": [message] }),
    )
    .with_status(StatusCode::UNPROCESSABLE_ENTITY)
    .into_response()
}

/// Persistence failures render the generic error page; details only go to the log
fn server_error(e: AppError) -> Response {
    error!(error = %e, "Story request failed");
    View::server_error().into_response()
}

/// HTTP handler for the add story page
///
/// GET /stories/add
pub async fn show_add_form() -> View {
    View::render("stories/add", &StoryForm::default())
}

/// HTTP handler for submitting a new story
///
/// POST /stories
/// Owner is always the caller; redirects to the dashboard
#[instrument(name = "create_story", skip(state, form), fields(user_id = %user.user_id))]
pub async fn create_story(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<StoryForm>,
) -> Response {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(AppError::Validation(message)) => {
            info!(reason = %message, "Rejected invalid story");
            return invalid_form("stories/add", None, &form, message);
        }
        Err(e) => return server_error(e),
    };

    match story_service(&state).create_story(user.user_id, draft).await {
        Ok(_) => Redirect::to(DASHBOARD_PAGE).into_response(),
        Err(AppError::Validation(message)) => invalid_form("stories/add", None, &form, message),
        Err(e) => server_error(e),
    }
}

/// HTTP handler for listing public stories
///
/// GET /stories
/// Newest first, each story with its owner
#[instrument(name = "list_stories", skip(state))]
pub async fn list_stories(State(state): State<AppState>) -> Response {
    match story_service(&state).list_public().await {
        Ok(stories) => {
            info!(story_count = stories.len(), "Public stories listed");
            View::new("stories/index", json!({ "stories": stories })).into_response()
        }
        Err(e) => server_error(e),
    }
}

/// HTTP handler for a single story
///
/// GET /stories/:id
/// Any logged-in user may read any story. Every failure renders the not found page.
#[instrument(name = "show_story", skip(state))]
pub async fn show_story(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = match parse_story_id(&id) {
        Ok(story_id) => story_service(&state).get_story(story_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(story) => View::new("stories/show", json!({ "story": story })).into_response(),
        Err(e) => {
            warn!(error = %e, "Story could not be shown");
            View::not_found().into_response()
        }
    }
}

/// HTTP handler for the edit page
///
/// GET /stories/edit/:id
/// Non-owners are sent back to the story list
#[instrument(name = "show_edit_form", skip(state), fields(user_id = %user.user_id))]
pub async fn show_edit_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let story_id = parse_story_id(&id)?;

    match story_service(&state)
        .get_owned_story(story_id, user.user_id)
        .await
    {
        Ok(OwnedStory::Owned(story)) => {
            Ok(View::new("stories/edit", json!({ "story": story })).into_response())
        }
        Ok(OwnedStory::NotOwner) => Ok(Redirect::to(STORIES_PAGE).into_response()),
        Ok(OwnedStory::NotFound) => Ok(View::not_found().into_response()),
        Err(e) => Ok(server_error(e)),
    }
}

/// HTTP handler for submitting edits
///
/// PUT /stories/:id
/// Only the owner may edit; redirects to the landing page
#[instrument(name = "update_story", skip(state, form), fields(user_id = %user.user_id))]
pub async fn update_story(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<StoryForm>,
) -> Result<Response, AppError> {
    let story_id = parse_story_id(&id)?;
    let service = story_service(&state);

    // Ownership is settled before the submitted fields are looked at.
    match service.get_owned_story(story_id, user.user_id).await {
        Ok(OwnedStory::Owned(_)) => {}
        Ok(OwnedStory::NotOwner) => return Ok(Redirect::to(STORIES_PAGE).into_response()),
        Ok(OwnedStory::NotFound) => return Ok(View::not_found().into_response()),
        Err(e) => return Ok(server_error(e)),
    }

    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(AppError::Validation(message)) => {
            return Ok(invalid_form("stories/edit", Some(story_id), &form, message))
        }
        Err(e) => return Ok(server_error(e)),
    };

    Ok(match service.update_story(story_id, user.user_id, draft).await {
        Ok(OwnedStory::Owned(_)) => Redirect::to(LANDING_PAGE).into_response(),
        Ok(OwnedStory::NotOwner) => Redirect::to(STORIES_PAGE).into_response(),
        Ok(OwnedStory::NotFound) => View::not_found().into_response(),
        Err(AppError::Validation(message)) => {
            invalid_form("stories/edit", Some(story_id), &form, message)
        }
        Err(e) => server_error(e),
    })
}

/// HTTP handler for removing a story
///
/// DELETE /stories/:id
/// Only the owner may delete; redirects to the dashboard
#[instrument(name = "delete_story", skip(state), fields(user_id = %user.user_id))]
pub async fn delete_story(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let story_id = parse_story_id(&id)?;

    Ok(match story_service(&state).delete_story(story_id, user.user_id).await {
        Ok(OwnedStory::Owned(_)) => Redirect::to(DASHBOARD_PAGE).into_response(),
        Ok(OwnedStory::NotOwner) => Redirect::to(STORIES_PAGE).into_response(),
        Ok(OwnedStory::NotFound) => View::not_found().into_response(),
        Err(e) => server_error(e),
    })
}
