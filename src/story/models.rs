use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::shared::AppError;
use crate::user::UserSummary;

/// Visibility of a story. Only public stories show up in listings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoryStatus {
    #[default]
    Public,
    Private,
}

/// The mutable fields of a story, already normalized and validated
#[derive(Debug, Clone, PartialEq)]
pub struct StoryDraft {
    pub title: String,
    pub body: String,
    pub status: StoryStatus,
}

impl StoryDraft {
    /// Trims the title and rejects empty title or body
    pub fn new(title: &str, body: &str, status: StoryStatus) -> Result<Self, AppError> {
        let draft = Self {
            title: title.trim().to_string(),
            body: body.to_string(),
            status,
        };
        validate_fields(&draft.title, &draft.body)?;
        Ok(draft)
    }
}

fn validate_fields(title: &str, body: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if body.trim().is_empty() {
        return Err(AppError::Validation("Body is required".to_string()));
    }
    Ok(())
}

/// Database model for stories table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryModel {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: StoryStatus,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl StoryModel {
    /// Creates a new story owned by `owner_id`, stamped with the current time
    pub fn new(draft: StoryDraft, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            body: draft.body,
            status: draft.status,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Overwrites title, body and status. Owner and creation time never change.
    pub fn apply(&mut self, draft: StoryDraft) {
        self.title = draft.title;
        self.body = draft.body;
        self.status = draft.status;
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn is_public(&self) -> bool {
        self.status == StoryStatus::Public
    }

    /// Re-checks field constraints before a write reaches the store
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.title, &self.body)
    }
}

/// A story with its owner's identity attached for rendering
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoryWithOwner {
    #[serde(flatten)]
    pub story: StoryModel,
    pub owner: Option<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("public", StoryStatus::Public)]
    #[case("private", StoryStatus::Private)]
    fn test_status_parses_known_values(#[case] raw: &str, #[case] expected: StoryStatus) {
        assert_eq!(StoryStatus::from_str(raw).unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("draft")]
    #[case("PUBLIC ")]
    #[case("friends-only")]
    fn test_status_rejects_unknown_values(#[case] raw: &str) {
        assert!(StoryStatus::from_str(raw).is_err());
    }

    #[test]
    fn test_status_defaults_to_public() {
        assert_eq!(StoryStatus::default(), StoryStatus::Public);
    }

    #[test]
    fn test_draft_trims_title() {
        let draft = StoryDraft::new("  Hello  ", "world", StoryStatus::Public).unwrap();
        assert_eq!(draft.title, "Hello");
        assert_eq!(draft.body, "world");
    }

    #[rstest]
    #[case("", "body")]
    #[case("   ", "body")]
    #[case("title", "")]
    fn test_draft_rejects_empty_fields(#[case] title: &str, #[case] body: &str) {
        let result = StoryDraft::new(title, body, StoryStatus::Public);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_apply_keeps_owner_and_timestamp() {
        let owner = Uuid::new_v4();
        let mut story = StoryModel::new(
            StoryDraft::new("First", "body", StoryStatus::Public).unwrap(),
            owner,
        );
        let id = story.id;
        let created_at = story.created_at;

        story.apply(StoryDraft::new("Second", "new body", StoryStatus::Private).unwrap());

        assert_eq!(story.id, id);
        assert_eq!(story.owner_id, owner);
        assert_eq!(story.created_at, created_at);
        assert_eq!(story.title, "Second");
        assert!(!story.is_public());
    }

    #[test]
    fn test_ownership_compares_identities() {
        let owner = Uuid::new_v4();
        let story = StoryModel::new(
            StoryDraft::new("Mine", "body", StoryStatus::Public).unwrap(),
            owner,
        );

        assert!(story.is_owned_by(owner));
        assert!(!story.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_story_with_owner_flattens_story_fields() {
        let story = StoryModel::new(
            StoryDraft::new("Flat", "body", StoryStatus::Private).unwrap(),
            Uuid::new_v4(),
        );
        let json = serde_json::to_value(StoryWithOwner {
            story,
            owner: None,
        })
        .unwrap();

        assert_eq!(json["title"], "Flat");
        assert_eq!(json["status"], "private");
        assert!(json["owner"].is_null());
    }
}
