use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::UserModel, repository::UserRepository};
use crate::auth::ProviderProfile;
use crate::shared::AppError;

/// Service for resolving provider logins to local users
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Returns the user linked to this provider profile, creating it on first login
    #[instrument(skip(self, profile), fields(provider_id = %profile.provider_id))]
    pub async fn find_or_create(&self, profile: &ProviderProfile) -> Result<UserModel, AppError> {
        if let Some(user) = self.repository.find_by_google_id(&profile.provider_id).await? {
            info!(user_id = %user.id, "Existing user logged in");
            return Ok(user);
        }

        let user = UserModel::from_profile(profile);
        self.repository.insert_user(&user).await?;
        info!(user_id = %user.id, "Created user from provider profile");

        Ok(user)
    }
}
