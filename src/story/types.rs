use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::models::{StoryDraft, StoryStatus};
use crate::shared::AppError;

/// Form payload for creating or editing a story
///
/// Missing fields deserialize as empty so they fail validation instead of
/// being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl StoryForm {
    /// Parses the status and validates the fields into a draft
    pub fn to_draft(&self) -> Result<StoryDraft, AppError> {
        let status = match self.status.as_deref() {
            None => StoryStatus::default(),
            Some(raw) => StoryStatus::from_str(raw)
                .map_err(|_| AppError::Validation(format!("Unknown status: {}", raw)))?,
        };

        StoryDraft::new(&self.title, &self.body, status)
    }
}
