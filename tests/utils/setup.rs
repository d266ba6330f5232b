use std::sync::Arc;

use storybook::{
    build_app,
    router::App,
    session::{
        repository::InMemorySessionRepository, service::SessionService, token::TokenConfig,
    },
    story::repository::InMemoryStoryRepository,
    user::repository::InMemoryUserRepository,
    AppState,
};

use super::mocks::MockIdentityProvider;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: App,
    pub state: AppState,
    pub stories: Arc<InMemoryStoryRepository>,
}

pub struct TestSetupBuilder {
    users: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { users: vec![] }
    }

    /// Users the identity provider will accept
    pub fn with_users(mut self, users: Vec<&str>) -> Self {
        self.users = users.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_alice_and_bob(self) -> Self {
        self.with_users(vec!["alice", "bob"])
    }

    pub async fn build(self) -> TestSetup {
        let provider = MockIdentityProvider::new();
        for user in &self.users {
            provider.register(user).await;
        }

        let stories = Arc::new(InMemoryStoryRepository::new());
        let session_service = SessionService::new(
            Arc::new(InMemorySessionRepository::new()),
            TokenConfig::with_secret("integration-secret", 1),
        );

        let state = AppState::new(
            stories.clone(),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(session_service),
            Arc::new(provider),
        );

        TestSetup {
            app: build_app(state.clone()),
            state,
            stories,
        }
    }
}
