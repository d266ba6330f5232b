use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::ProviderProfile;

/// Database model for users table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub google_id: String, // Provider subject, unique per user
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a new local user from the profile the provider returned
    pub fn from_profile(profile: &ProviderProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            google_id: profile.provider_id.clone(),
            display_name: profile.display_name.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            image: profile.image.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Owner identity attached to stories when rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub display_name: String,
    pub image: Option<String>,
}

impl From<&UserModel> for UserSummary {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            image: user.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_profile_copies_identity() {
        let profile = ProviderProfile {
            provider_id: "google-123".to_string(),
            display_name: "Ada Lovelace".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            image: Some("https://example.com/ada.png".to_string()),
        };

        let user = UserModel::from_profile(&profile);

        assert_eq!(user.google_id, "google-123");
        assert_eq!(user.display_name, "Ada Lovelace");
        assert_eq!(user.image.as_deref(), Some("https://example.com/ada.png"));

        let summary = UserSummary::from(&user);
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.display_name, "Ada Lovelace");
    }
}
