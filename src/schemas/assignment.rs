use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schemas::schedule::SchedulePayload;
use crate::schemas::scoring::ScoringRubric;
use crate::schemas::submission::SubmissionInstruction;

/// One of the three instruction panels shown alongside the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// The full aggregate persisted by `POST /{agency}/reports/` and
/// `PUT /reports/{id}/`. Built once from wizard state at submit time;
/// intermediate steps never persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssignmentPayload {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, alias = "contentBlocks")]
    pub content_blocks: Vec<ContentBlock>,
    #[serde(default, alias = "videoLink")]
    pub video_link: Option<String>,
    #[serde(default, alias = "videoCover")]
    pub video_cover: Option<String>,
    #[serde(default, alias = "fileUrls")]
    pub file_urls: Vec<String>,
    #[serde(default, alias = "schoolYear")]
    pub school_year: Option<String>,
    #[serde(default, alias = "completionTime")]
    pub completion_time: Option<String>,
    #[validate(nested)]
    pub schedule: SchedulePayload,
    pub submission: SubmissionInstruction,
    #[serde(default)]
    pub scoring: Option<ScoringRubric>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentResponse {
    pub id: String,
    #[serde(flatten)]
    pub assignment: AssignmentPayload,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,
}
