use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{StoryDraft, StoryModel, StoryWithOwner},
    repository::StoryRepository,
};
use crate::{
    shared::AppError,
    user::{repository::UserRepository, UserSummary},
};

/// Outcome of an operation that only the story's owner may perform
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedStory {
    /// Caller owns the story; carries the story as it now stands
    Owned(StoryModel),
    /// Story exists but belongs to someone else, nothing was changed
    NotOwner,
    /// Story does not exist
    NotFound,
}

/// Service for handling story business logic
pub struct StoryService {
    stories: Arc<dyn StoryRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl StoryService {
    pub fn new(
        stories: Arc<dyn StoryRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self { stories, users }
    }

    #[instrument(skip(self, draft))]
    pub async fn create_story(
        &self,
        owner_id: Uuid,
        draft: StoryDraft,
    ) -> Result<StoryModel, AppError> {
        let story = StoryModel::new(draft, owner_id);
        self.stories.create_story(&story).await?;

        info!(story_id = %story.id, owner_id = %owner_id, "Story created");
        Ok(story)
    }

    /// Public stories, newest first, each with its owner attached
    #[instrument(skip(self))]
    pub async fn list_public(&self) -> Result<Vec<StoryWithOwner>, AppError> {
        let stories = self.stories.find_public().await?;
        debug!(story_count = stories.len(), "Public stories retrieved");

        let mut with_owners = Vec::with_capacity(stories.len());
        for story in stories {
            with_owners.push(self.attach_owner(story).await?);
        }

        Ok(with_owners)
    }

    #[instrument(skip(self))]
    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<StoryModel>, AppError> {
        self.stories.find_by_owner(owner_id).await
    }

    /// Any authenticated user may read any story by id
    #[instrument(skip(self))]
    pub async fn get_story(&self, story_id: Uuid) -> Result<StoryWithOwner, AppError> {
        let story = self
            .stories
            .get_story(story_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Story {}", story_id)))?;

        self.attach_owner(story).await
    }

    /// Looks up a story for editing, enforcing ownership
    #[instrument(skip(self))]
    pub async fn get_owned_story(
        &self,
        story_id: Uuid,
        user_id: Uuid,
    ) -> Result<OwnedStory, AppError> {
        match self.stories.get_story(story_id).await? {
            None => Ok(OwnedStory::NotFound),
            Some(story) if story.is_owned_by(user_id) => Ok(OwnedStory::Owned(story)),
            Some(_) => {
                warn!(
                    story_id = %story_id,
                    user_id = %user_id,
                    "Non-owner attempted to access story"
                );
                Ok(OwnedStory::NotOwner)
            }
        }
    }

    #[instrument(skip(self, draft))]
    pub async fn update_story(
        &self,
        story_id: Uuid,
        user_id: Uuid,
        draft: StoryDraft,
    ) -> Result<OwnedStory, AppError> {
        if let other @ (OwnedStory::NotOwner | OwnedStory::NotFound) =
            self.get_owned_story(story_id, user_id).await?
        {
            return Ok(other);
        }

        // A concurrent delete between the check and the write surfaces as NotFound.
        match self.stories.update_story(story_id, &draft).await? {
            Some(updated) => {
                info!(story_id = %story_id, "Story updated");
                Ok(OwnedStory::Owned(updated))
            }
            None => Ok(OwnedStory::NotFound),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_story(
        &self,
        story_id: Uuid,
        user_id: Uuid,
    ) -> Result<OwnedStory, AppError> {
        let story = match self.get_owned_story(story_id, user_id).await? {
            OwnedStory::Owned(story) => story,
            other => return Ok(other),
        };

        if !self.stories.delete_story(story_id).await? {
            return Ok(OwnedStory::NotFound);
        }

        info!(story_id = %story_id, "Story deleted");
        Ok(OwnedStory::Owned(story))
    }

    async fn attach_owner(&self, story: StoryModel) -> Result<StoryWithOwner, AppError> {
        let owner = self
            .users
            .get_user(story.owner_id)
            .await?
            .as_ref()
            .map(UserSummary::from);

        if owner.is_none() {
            warn!(story_id = %story.id, owner_id = %story.owner_id, "Story owner not found");
        }

        Ok(StoryWithOwner { story, owner })
    }
}
