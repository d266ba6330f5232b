use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::models::{StoryDraft, StoryModel, StoryStatus};
use crate::shared::AppError;

/// Trait for story repository operations
#[async_trait]
pub trait StoryRepository {
    async fn create_story(&self, story: &StoryModel) -> Result<(), AppError>;

    /// Public stories only, newest first
    async fn find_public(&self) -> Result<Vec<StoryModel>, AppError>;

    /// Every story the user owns regardless of status, newest first
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<StoryModel>, AppError>;

    async fn get_story(&self, story_id: Uuid) -> Result<Option<StoryModel>, AppError>;

    /// Overwrites the mutable fields, returns None when the story does not exist
    async fn update_story(
        &self,
        story_id: Uuid,
        draft: &StoryDraft,
    ) -> Result<Option<StoryModel>, AppError>;

    /// Returns false when there was nothing to delete
    async fn delete_story(&self, story_id: Uuid) -> Result<bool, AppError>;
}

fn newest_first(mut stories: Vec<StoryModel>) -> Vec<StoryModel> {
    stories.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    stories
}

/// In-memory implementation of StoryRepository for development and testing
///
/// Writes to the same record are serialized by the map's mutex.
pub struct InMemoryStoryRepository {
    stories: Mutex<HashMap<Uuid, StoryModel>>,
}

impl Default for InMemoryStoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self {
            stories: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated stories
    pub fn with_stories(stories: Vec<StoryModel>) -> Self {
        let story_map = stories.into_iter().map(|s| (s.id, s)).collect();
        Self {
            stories: Mutex::new(story_map),
        }
    }

    pub async fn story_count(&self) -> usize {
        self.stories.lock().await.len()
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    #[instrument(skip(self, story))]
    async fn create_story(&self, story: &StoryModel) -> Result<(), AppError> {
        debug!(story_id = %story.id, owner_id = %story.owner_id, "Creating story in memory");
        story.validate()?;

        let mut stories = self.stories.lock().await;
        if stories.contains_key(&story.id) {
            warn!(story_id = %story.id, "Story already exists in memory");
            return Err(AppError::DatabaseError("Story already exists".to_string()));
        }
        stories.insert(story.id, story.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_public(&self) -> Result<Vec<StoryModel>, AppError> {
        let stories = self.stories.lock().await;
        let public = stories.values().filter(|s| s.is_public()).cloned().collect();
        Ok(newest_first(public))
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<StoryModel>, AppError> {
        let stories = self.stories.lock().await;
        let owned = stories
            .values()
            .filter(|s| s.is_owned_by(owner_id))
            .cloned()
            .collect();
        Ok(newest_first(owned))
    }

    #[instrument(skip(self))]
    async fn get_story(&self, story_id: Uuid) -> Result<Option<StoryModel>, AppError> {
        let stories = self.stories.lock().await;
        let story = stories.get(&story_id).cloned();

        if story.is_none() {
            debug!(story_id = %story_id, "Story not found in memory");
        }

        Ok(story)
    }

    #[instrument(skip(self, draft))]
    async fn update_story(
        &self,
        story_id: Uuid,
        draft: &StoryDraft,
    ) -> Result<Option<StoryModel>, AppError> {
        let mut stories = self.stories.lock().await;

        let Some(story) = stories.get_mut(&story_id) else {
            debug!(story_id = %story_id, "Story not found for update in memory");
            return Ok(None);
        };

        let mut updated = story.clone();
        updated.apply(draft.clone());
        updated.validate()?;
        *story = updated.clone();

        info!(story_id = %story_id, "Story updated in memory");
        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    async fn delete_story(&self, story_id: Uuid) -> Result<bool, AppError> {
        let mut stories = self.stories.lock().await;
        let removed = stories.remove(&story_id).is_some();

        if !removed {
            debug!(story_id = %story_id, "Story not found for deletion in memory");
        }

        Ok(removed)
    }
}

/// PostgreSQL implementation of story repository
pub struct PostgresStoryRepository {
    pool: PgPool,
}

impl PostgresStoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const STORY_COLUMNS: &str = "id, title, body, status, owner_id, created_at";

fn story_from_row(row: &PgRow) -> Result<StoryModel, AppError> {
    let status: String = row.get("status");
    let status = StoryStatus::from_str(&status).map_err(|_| {
        warn!(status = %status, "Unknown story status stored in database");
        AppError::DatabaseError(format!("Unknown story status: {}", status))
    })?;

    Ok(StoryModel {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        status,
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
    })
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, "{}", context);
        AppError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl StoryRepository for PostgresStoryRepository {
    #[instrument(skip(self, story))]
    async fn create_story(&self, story: &StoryModel) -> Result<(), AppError> {
        debug!(
            story_id = %story.id,
            owner_id = %story.owner_id,
            "Creating story in database"
        );
        story.validate()?;

        sqlx::query(
            "INSERT INTO stories (id, title, body, status, owner_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(story.id)
        .bind(&story.title)
        .bind(&story.body)
        .bind(story.status.to_string())
        .bind(story.owner_id)
        .bind(story.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to create story in database"))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_public(&self) -> Result<Vec<StoryModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM stories WHERE status = 'public' ORDER BY created_at DESC, id DESC",
            STORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list public stories"))?;

        rows.iter().map(story_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<StoryModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM stories WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
            STORY_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list stories for owner"))?;

        rows.iter().map(story_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn get_story(&self, story_id: Uuid) -> Result<Option<StoryModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM stories WHERE id = $1", STORY_COLUMNS))
            .bind(story_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch story from database"))?;

        row.as_ref().map(story_from_row).transpose()
    }

    #[instrument(skip(self, draft))]
    async fn update_story(
        &self,
        story_id: Uuid,
        draft: &StoryDraft,
    ) -> Result<Option<StoryModel>, AppError> {
        // The draft was validated when it was built; owner and created_at are left alone.
        let row = sqlx::query(&format!(
            "UPDATE stories SET title = $2, body = $3, status = $4 WHERE id = $1 RETURNING {}",
            STORY_COLUMNS
        ))
        .bind(story_id)
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(draft.status.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update story in database"))?;

        row.as_ref().map(story_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_story(&self, story_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(story_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete story from database"))?;

        Ok(result.rows_affected() > 0)
    }
}
