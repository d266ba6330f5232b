use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use oauth2::CsrfToken;
use storybook::{AppError, AuthorizationRequest, IdentityProvider, ProviderProfile};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Identity provider that treats the authorization code as a username
#[derive(Clone, Default)]
pub struct MockIdentityProvider {
    profiles: Arc<RwLock<HashMap<String, ProviderProfile>>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, username: &str) {
        let profile = ProviderProfile {
            provider_id: format!("google-{}", username),
            display_name: username.to_string(),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            image: None,
        };
        self.profiles
            .write()
            .await
            .insert(username.to_string(), profile);
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorization_request(&self) -> AuthorizationRequest {
        let csrf_state = CsrfToken::new_random().secret().clone();
        AuthorizationRequest {
            url: format!(
                "https://provider.test/authorize?scope=profile&state={}",
                csrf_state
            ),
            csrf_state,
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AppError> {
        self.profiles
            .read()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::AuthFailure(format!("Unknown code: {}", code)))
    }
}
