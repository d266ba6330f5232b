use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::IdentityProvider;
use crate::session::service::SessionService;
use crate::story::repository::StoryRepository;
use crate::user::repository::UserRepository;
use crate::view::View;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub story_repository: Arc<dyn StoryRepository + Send + Sync>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub session_service: Arc<SessionService>,
    pub identity_provider: Arc<dyn IdentityProvider + Send + Sync>,
}

impl AppState {
    pub fn new(
        story_repository: Arc<dyn StoryRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        session_service: Arc<SessionService>,
        identity_provider: Arc<dyn IdentityProvider + Send + Sync>,
    ) -> Self {
        Self {
            story_repository,
            user_repository,
            session_service,
            identity_provider,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Identity provider rejected login: {0}")]
    AuthFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Details stay in the log; the client only ever sees the error page.
        match self {
            AppError::NotFound(msg) => {
                warn!(reason = %msg, "Rendering not found page");
                View::not_found().into_response()
            }
            AppError::Validation(msg) => View::new("error/422", json!({ "errors": [msg] }))
                .with_status(StatusCode::UNPROCESSABLE_ENTITY)
                .into_response(),
            AppError::Unauthorized(msg) | AppError::AuthFailure(msg) => {
                warn!(reason = %msg, "Authentication failed, redirecting to landing page");
                Redirect::to("/").into_response()
            }
            other => {
                error!(error = %other, "Request failed");
                View::server_error().into_response()
            }
        }
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::auth::{AuthorizationRequest, ProviderProfile};
    use crate::session::{
        models::SessionModel,
        repository::{InMemorySessionRepository, SessionRepository},
        token::TokenConfig,
    };
    use crate::story::models::{StoryDraft, StoryModel};
    use crate::story::repository::InMemoryStoryRepository;
    use crate::user::models::UserModel;
    use crate::user::repository::InMemoryUserRepository;
    use async_trait::async_trait;
    use oauth2::CsrfToken;
    use uuid::Uuid;

    /// Identity provider that knows a fixed set of authorization codes
    pub struct StaticIdentityProvider {
        profiles: Vec<(String, ProviderProfile)>,
    }

    impl StaticIdentityProvider {
        pub fn new(profiles: Vec<(String, ProviderProfile)>) -> Self {
            Self { profiles }
        }
    }

    #[async_trait]
    impl IdentityProvider for StaticIdentityProvider {
        fn authorization_request(&self) -> AuthorizationRequest {
            let csrf_state = CsrfToken::new_random().secret().clone();
            AuthorizationRequest {
                url: format!("https://provider.test/authorize?state={}", csrf_state),
                csrf_state,
            }
        }

        async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AppError> {
            self.profiles
                .iter()
                .find(|(known, _)| known == code)
                .map(|(_, profile)| profile.clone())
                .ok_or_else(|| AppError::AuthFailure(format!("Unknown code: {}", code)))
        }
    }

    fn unreachable_database() -> AppError {
        AppError::DatabaseError("connection refused".to_string())
    }

    /// Story repository whose every call fails like an unreachable database
    pub struct FailingStoryRepository;

    #[async_trait]
    impl StoryRepository for FailingStoryRepository {
        async fn create_story(&self, _story: &StoryModel) -> Result<(), AppError> {
            Err(unreachable_database())
        }
        async fn find_public(&self) -> Result<Vec<StoryModel>, AppError> {
            Err(unreachable_database())
        }
        async fn find_by_owner(&self, _owner_id: Uuid) -> Result<Vec<StoryModel>, AppError> {
            Err(unreachable_database())
        }
        async fn get_story(&self, _story_id: Uuid) -> Result<Option<StoryModel>, AppError> {
            Err(unreachable_database())
        }
        async fn update_story(
            &self,
            _story_id: Uuid,
            _draft: &StoryDraft,
        ) -> Result<Option<StoryModel>, AppError> {
            Err(unreachable_database())
        }
        async fn delete_story(&self, _story_id: Uuid) -> Result<bool, AppError> {
            Err(unreachable_database())
        }
    }

    /// Session store that reads and writes normally but cannot delete
    #[derive(Default)]
    pub struct UndeletableSessionRepository {
        inner: InMemorySessionRepository,
    }

    impl UndeletableSessionRepository {
        pub async fn session_count(&self) -> usize {
            self.inner.session_count().await
        }
    }

    #[async_trait]
    impl SessionRepository for UndeletableSessionRepository {
        async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
            self.inner.create_session(session).await
        }
        async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError> {
            self.inner.get_session(session_id).await
        }
        async fn delete_session(&self, _session_id: &str) -> Result<(), AppError> {
            Err(unreachable_database())
        }
        async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
            self.inner.cleanup_expired_sessions().await
        }
    }

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        story_repository: Option<Arc<dyn StoryRepository + Send + Sync>>,
        user_repository: Option<Arc<dyn UserRepository + Send + Sync>>,
        session_repository: Option<Arc<dyn SessionRepository + Send + Sync>>,
        profiles: Vec<(String, ProviderProfile)>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                story_repository: None,
                user_repository: None,
                session_repository: None,
                profiles: Vec::new(),
            }
        }

        pub fn with_story_repository(
            mut self,
            repo: Arc<dyn StoryRepository + Send + Sync>,
        ) -> Self {
            self.story_repository = Some(repo);
            self
        }

        pub fn with_user_repository(
            mut self,
            repo: Arc<dyn UserRepository + Send + Sync>,
        ) -> Self {
            self.user_repository = Some(repo);
            self
        }

        pub fn with_session_repository(
            mut self,
            repo: Arc<dyn SessionRepository + Send + Sync>,
        ) -> Self {
            self.session_repository = Some(repo);
            self
        }

        /// Registers a provider profile returned when the callback presents `code`
        pub fn with_profile(mut self, code: &str, profile: ProviderProfile) -> Self {
            self.profiles.push((code.to_string(), profile));
            self
        }

        pub fn build(self) -> AppState {
            let session_repository = self
                .session_repository
                .unwrap_or_else(|| Arc::new(InMemorySessionRepository::new()));
            let session_service = SessionService::new(
                session_repository,
                TokenConfig::with_secret("test-secret", 1),
            );

            AppState {
                story_repository: self
                    .story_repository
                    .unwrap_or_else(|| Arc::new(InMemoryStoryRepository::new())),
                user_repository: self
                    .user_repository
                    .unwrap_or_else(|| Arc::new(InMemoryUserRepository::new())),
                session_service: Arc::new(session_service),
                identity_provider: Arc::new(StaticIdentityProvider::new(self.profiles)),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Creates a user plus a live session and returns the cookie header value
    pub async fn login_as(state: &AppState, user: &UserModel) -> String {
        state.user_repository.insert_user(user).await.unwrap();
        let token = state.session_service.create_session(user.id).await.unwrap();
        format!("{}={}", crate::session::SESSION_COOKIE, token)
    }
}
