use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    models::SessionModel, repository::SessionRepository, token::TokenConfig, types::SessionClaims,
};
use crate::shared::AppError;

/// Service for handling session business logic
pub struct SessionService {
    token_config: TokenConfig,
    repository: Arc<dyn SessionRepository + Send + Sync>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            token_config,
            repository,
        }
    }

    /// Stores a new session for the user and returns its signed token
    #[instrument(skip(self))]
    pub async fn create_session(&self, user_id: Uuid) -> Result<String, AppError> {
        let session = SessionModel::new(user_id, self.token_config.expiration_days)?;
        self.repository.create_session(&session).await?;

        let token = self
            .token_config
            .create_token(session.id.clone(), user_id)?;

        info!(session_id = %session.id, user_id = %user_id, "Session created");
        Ok(token)
    }

    /// Validates a session token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        // First validate JWT token structure and signature
        let claims = self.token_config.validate_token(token)?;

        // Then validate session exists in database and hasn't been revoked
        match self.repository.get_session(&claims.session_id).await? {
            Some(session) if session.is_expired() => {
                warn!(session_id = %claims.session_id, "Session found but has expired");
                Err(AppError::Unauthorized("Session has expired".to_string()))
            }
            Some(session) if session.user_id != claims.user_id => {
                warn!(session_id = %claims.session_id, "Token user does not match session");
                Err(AppError::Unauthorized("Session user mismatch".to_string()))
            }
            Some(_) => Ok(claims),
            None => {
                warn!(
                    session_id = %claims.session_id,
                    "Session not found in database - may have been revoked"
                );
                Err(AppError::Unauthorized(
                    "Session not found or has been revoked".to_string(),
                ))
            }
        }
    }

    /// Revokes a session by removing it from the store
    #[instrument(skip(self))]
    pub async fn revoke_session(&self, session_id: &str) -> Result<(), AppError> {
        self.repository.delete_session(session_id).await?;
        info!(session_id = %session_id, "Session revoked");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        self.repository.cleanup_expired_sessions().await
    }
}
