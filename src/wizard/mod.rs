pub mod aggregate;
pub mod controller;
pub mod uploads;

use async_trait::async_trait;

use crate::schemas::assignment::{AssignmentPayload, AssignmentResponse};
use crate::schemas::category::{CategoryCreate, CategoryResponse};
use crate::services::api::ApiError;

pub use aggregate::{
    AssignmentDraft, ScheduleChange, ScheduleState, ScoringChange, ScoringState, SetupChange,
    SetupState, SubmissionChange, SubmissionState, WizardChange,
};
pub use controller::{
    AdvanceOutcome, FieldError, UploadPolicy, WizardController, WizardStep,
};
pub use uploads::{PendingFile, UploadQueue, UploadStatus, PENDING_PLACEHOLDER};

#[derive(Debug, Clone)]
pub struct UploadProgress {
    pub filename: String,
    pub sent: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct FileUpload<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Transport seam for file uploads, so the wizard's sequencing can be
/// exercised without a network.
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload(&self, file: FileUpload<'_>) -> anyhow::Result<String>;
}

/// The REST calls the wizard persists through.
#[async_trait]
pub trait AssignmentBackend: Send + Sync {
    async fn create_category(
        &self,
        payload: &CategoryCreate,
    ) -> Result<CategoryResponse, ApiError>;

    async fn create_assignment(
        &self,
        agency: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentResponse, ApiError>;

    async fn update_assignment(
        &self,
        id: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentResponse, ApiError>;
}
