use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::AppError;

/// Database model for user sessions table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionModel {
    pub id: String, // UUID v4 as string, carried in the token claims
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionModel {
    /// Creates a new session for `user_id` with generated ID and timestamps
    pub fn new(user_id: Uuid, expiration_days: i64) -> Result<Self, AppError> {
        let now = Utc::now();
        let expires_at = TimeDelta::try_days(expiration_days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Session lifetime of {} days is out of range",
                    expiration_days
                ))
            })?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at,
        })
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
