use std::sync::Arc;

use crate::core::config::Settings;
use crate::schemas::assignment::AssignmentResponse;
use crate::schemas::category::{is_hex_color, CategoryCreate, CategoryResponse};
use crate::services::api::ApiError;
use crate::wizard::aggregate::{AssignmentDraft, SetupChange, WizardChange};
use crate::wizard::uploads::{self, UploadQueue, UploadStatus};
use crate::wizard::{AssignmentBackend, FileUploader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Setup,
    Schedule,
    Submission,
    Scoring,
    Review,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Setup => 1,
            WizardStep::Schedule => 2,
            WizardStep::Submission => 3,
            WizardStep::Scoring => 4,
            WizardStep::Review => 5,
        }
    }

    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Setup => Some(WizardStep::Schedule),
            WizardStep::Schedule => Some(WizardStep::Submission),
            WizardStep::Submission => Some(WizardStep::Scoring),
            WizardStep::Scoring => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }
}

/// Inline error next to a specific field; blocks only the action gated on
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum AdvanceOutcome {
    Moved(WizardStep),
    Blocked(Vec<FieldError>),
    UploadFailed { filename: String, message: String },
    Submitted(Box<AssignmentResponse>),
    SubmitFailed { banner: String },
}

/// Client-side constraints on picked files, sourced from `Settings`.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub allowed_cover_extensions: Vec<String>,
    pub max_resource_files: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_cover_extensions: ["jpg", "jpeg", "png", "webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_resource_files: 10,
        }
    }
}

impl UploadPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            allowed_cover_extensions: settings.uploads().allowed_cover_extensions.clone(),
            max_resource_files: settings.uploads().max_resource_files as usize,
        }
    }
}

/// The 5-step report-assignment wizard.
///
/// All state mutation is synchronous; the only suspension points are the
/// network calls (uploads, category creation, final submit), each guarded
/// against duplicate triggering the way the UI disables its button.
pub struct WizardController {
    backend: Arc<dyn AssignmentBackend>,
    uploader: Arc<dyn FileUploader>,
    agency: String,
    draft: AssignmentDraft,
    uploads: UploadQueue,
    step: WizardStep,
    existing_id: Option<String>,
    base_cover: Option<String>,
    base_file_urls: Vec<String>,
    banner: Option<String>,
    policy: UploadPolicy,
    submitting: bool,
    category_in_flight: bool,
}

impl WizardController {
    pub fn new(
        agency: impl Into<String>,
        backend: Arc<dyn AssignmentBackend>,
        uploader: Arc<dyn FileUploader>,
    ) -> Self {
        Self {
            backend,
            uploader,
            agency: agency.into(),
            draft: AssignmentDraft::default(),
            uploads: UploadQueue::default(),
            step: WizardStep::Setup,
            existing_id: None,
            base_cover: None,
            base_file_urls: Vec::new(),
            banner: None,
            policy: UploadPolicy::default(),
            submitting: false,
            category_in_flight: false,
        }
    }

    /// Edit an already-persisted assignment: the draft is pre-populated and
    /// the final call becomes an update instead of a create.
    pub fn for_existing(
        agency: impl Into<String>,
        assignment: &AssignmentResponse,
        backend: Arc<dyn AssignmentBackend>,
        uploader: Arc<dyn FileUploader>,
    ) -> Self {
        let mut controller = Self::new(agency, backend, uploader);
        controller.draft = AssignmentDraft::from_payload(&assignment.assignment);
        controller.existing_id = Some(assignment.id.clone());
        controller.base_cover = assignment.assignment.video_cover.clone();
        controller.base_file_urls = assignment.assignment.file_urls.clone();
        controller
    }

    pub fn with_upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &AssignmentDraft {
        &self.draft
    }

    pub fn uploads(&self) -> &UploadQueue {
        &self.uploads
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn category_request_in_flight(&self) -> bool {
        self.category_in_flight
    }

    /// Mirror a field edit into the aggregate immediately. There is no
    /// cancel: navigating away keeps whatever was typed.
    pub fn apply(&mut self, change: WizardChange) {
        self.draft.apply(change);
    }

    pub fn attach_cover(
        &mut self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, FieldError> {
        validate_cover_file(filename, content_type, &self.policy.allowed_cover_extensions)?;
        let id = self.uploads.set_cover(filename, content_type, bytes);
        self.sync_files_into_draft();
        Ok(id)
    }

    pub fn attach_resource(
        &mut self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, FieldError> {
        if filename.trim().is_empty() {
            return Err(FieldError {
                field: "file_urls",
                message: "File must have a name".to_string(),
            });
        }
        let staged = self.base_file_urls.len() + self.uploads.resources().len();
        if staged >= self.policy.max_resource_files {
            return Err(FieldError {
                field: "file_urls",
                message: format!(
                    "No more than {} resource files per assignment",
                    self.policy.max_resource_files
                ),
            });
        }
        let id = self.uploads.add_resource(filename, content_type, bytes);
        self.sync_files_into_draft();
        Ok(id)
    }

    /// Stop tracking a staged file. An upload already on the wire is
    /// fire-and-forget and is not aborted.
    pub fn remove_file(&mut self, id: &str) -> bool {
        let removed = self.uploads.remove(id);
        if removed {
            self.sync_files_into_draft();
        }
        removed
    }

    /// Drop a file reference that was persisted with the assignment.
    pub fn remove_persisted_file(&mut self, url: &str) -> bool {
        let before = self.base_file_urls.len();
        self.base_file_urls.retain(|existing| existing != url);
        let removed = self.base_file_urls.len() != before;
        if removed {
            self.sync_files_into_draft();
        }
        removed
    }

    pub fn clear_cover(&mut self) {
        self.uploads.clear_cover();
        self.base_cover = None;
        self.sync_files_into_draft();
    }

    /// Only the Setup step carries hard gates; everything else is
    /// presentation-level "required" markers that never block.
    pub fn setup_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.draft.setup.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "Report name is required".to_string(),
            });
        }

        if let Some(link) = &self.draft.setup.video_link {
            if !link.trim().is_empty() && !is_web_url(link) {
                errors.push(FieldError {
                    field: "video_link",
                    message: "Video link must be a valid URL".to_string(),
                });
            }
        }

        errors
    }

    /// Next. Runs the current step's side effects, then moves forward;
    /// from Review it is terminal and triggers the final submit instead.
    pub async fn advance(&mut self) -> AdvanceOutcome {
        match self.step {
            WizardStep::Setup => {
                let errors = self.setup_errors();
                if !errors.is_empty() {
                    return AdvanceOutcome::Blocked(errors);
                }

                if let Err(failure) =
                    uploads::flush(&mut self.uploads, self.uploader.as_ref()).await
                {
                    return AdvanceOutcome::UploadFailed {
                        filename: failure.filename,
                        message: failure.message,
                    };
                }
                self.commit_uploaded();

                self.step = WizardStep::Schedule;
                AdvanceOutcome::Moved(self.step)
            }
            WizardStep::Review => self.submit().await,
            step => {
                // Soft validation by design: nothing here blocks.
                self.step = step.next().unwrap_or(WizardStep::Review);
                AdvanceOutcome::Moved(self.step)
            }
        }
    }

    /// Backward navigation is reserved for the Review summary's edit
    /// links; intervening steps are not re-validated.
    pub fn navigate_to(&mut self, step: WizardStep) -> bool {
        if self.step == WizardStep::Review && step < WizardStep::Review {
            self.step = step;
            return true;
        }
        false
    }

    /// Persist from any step. Pending uploads are flushed first so the
    /// payload never carries placeholder entries.
    pub async fn save_and_exit(&mut self) -> AdvanceOutcome {
        if !self.uploads.all_uploaded() {
            if let Err(failure) = uploads::flush(&mut self.uploads, self.uploader.as_ref()).await {
                return AdvanceOutcome::UploadFailed {
                    filename: failure.filename,
                    message: failure.message,
                };
            }
        }
        self.commit_uploaded();
        self.submit().await
    }

    /// Create a category inline from the Setup step. While a request is
    /// outstanding the trigger is disabled; a duplicate call is a no-op.
    pub async fn create_category(
        &mut self,
        name: &str,
        color: &str,
    ) -> Result<Option<CategoryResponse>, ApiError> {
        if self.category_in_flight {
            return Ok(None);
        }

        let payload = CategoryCreate { name: name.trim().to_string(), color: color.to_string() };
        if payload.name.is_empty() {
            return Err(ApiError::Validation("Category name is required".to_string()));
        }
        if !is_hex_color(&payload.color) {
            return Err(ApiError::Validation(format!(
                "color must be a hex value like #1f6f4a, got '{color}'"
            )));
        }

        self.category_in_flight = true;
        let result = self.backend.create_category(&payload).await;
        self.category_in_flight = false;

        match result {
            Ok(category) => {
                self.draft.apply_setup(SetupChange::AddCategory(category.id.clone()));
                Ok(Some(category))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Category creation failed");
                Err(err)
            }
        }
    }

    async fn submit(&mut self) -> AdvanceOutcome {
        let errors = self.setup_errors();
        if !errors.is_empty() {
            return AdvanceOutcome::Blocked(errors);
        }

        self.banner = None;
        self.submitting = true;
        let payload = self.draft.to_payload();
        let result = match &self.existing_id {
            Some(id) => self.backend.update_assignment(id, &payload).await,
            None => self.backend.create_assignment(&self.agency, &payload).await,
        };
        self.submitting = false;

        match result {
            Ok(response) => {
                self.existing_id = Some(response.id.clone());
                tracing::info!(assignment_id = %response.id, "Report assignment saved");
                AdvanceOutcome::Submitted(Box::new(response))
            }
            Err(err) => {
                // Draft state stays intact so the same action can be retried.
                let banner = err.to_string();
                tracing::error!(error = %err, "Failed to save report assignment");
                self.banner = Some(banner.clone());
                AdvanceOutcome::SubmitFailed { banner }
            }
        }
    }

    /// Promote freshly uploaded keys into the committed file fields. Runs
    /// only after every staged upload finished.
    fn commit_uploaded(&mut self) {
        if let Some(cover) = self.uploads.cover() {
            if cover.status == UploadStatus::Uploaded {
                self.base_cover = cover.key.clone();
            }
        }
        for file in self.uploads.resources() {
            if file.status == UploadStatus::Uploaded {
                if let Some(key) = &file.key {
                    self.base_file_urls.push(key.clone());
                }
            }
        }
        self.uploads.clear();
        self.sync_files_into_draft();
    }

    /// Keep the aggregate's file fields in step with the staged queue:
    /// committed keys first, then one entry per staged file (placeholder
    /// until its upload finishes).
    fn sync_files_into_draft(&mut self) {
        let mut urls = self.base_file_urls.clone();
        urls.extend(self.uploads.resource_keys());
        self.draft.setup.file_urls = urls;
        self.draft.setup.video_cover = match self.uploads.cover() {
            Some(file) => Some(file.wire_key()),
            None => self.base_cover.clone(),
        };
    }
}

fn is_web_url(link: &str) -> bool {
    match reqwest::Url::parse(link.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn validate_cover_file(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), FieldError> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| FieldError {
            field: "video_cover",
            message: "File must have an extension".to_string(),
        })?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(FieldError {
            field: "video_cover",
            message: format!("File extension '{extension}' is not allowed"),
        });
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(FieldError {
            field: "video_cover",
            message: format!("MIME type '{mime}' does not match extension '.{extension}'"),
        })
    }
}

fn mime_allowed_for_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "jpg" | "jpeg" => matches!(mime, "image/jpeg" | "image/jpg"),
        "png" => mime == "image/png",
        "webp" => mime == "image/webp",
        "gif" => mime == "image/gif",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::core::time::parse_iso_date;
    use crate::schemas::assignment::AssignmentPayload;
    use crate::schemas::category::CategoryResponse;
    use crate::schemas::schedule::ScheduleType;
    use crate::wizard::aggregate::ScheduleChange;
    use crate::wizard::{FileUpload, PENDING_PLACEHOLDER};

    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<String>>,
        payloads: Mutex<Vec<AssignmentPayload>>,
        fail_submit: Mutex<bool>,
    }

    impl FakeBackend {
        fn set_fail_submit(&self, fail: bool) {
            *self.fail_submit.lock().expect("lock") = fail;
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock").clone()
        }

        fn last_payload(&self) -> AssignmentPayload {
            self.payloads.lock().expect("lock").last().cloned().expect("payload recorded")
        }
    }

    #[async_trait]
    impl AssignmentBackend for FakeBackend {
        async fn create_category(
            &self,
            payload: &CategoryCreate,
        ) -> Result<CategoryResponse, ApiError> {
            self.calls.lock().expect("lock").push(format!("category:{}", payload.name));
            Ok(CategoryResponse {
                id: "cat-1".to_string(),
                name: payload.name.clone(),
                color: payload.color.clone(),
            })
        }

        async fn create_assignment(
            &self,
            agency: &str,
            payload: &AssignmentPayload,
        ) -> Result<AssignmentResponse, ApiError> {
            if *self.fail_submit.lock().expect("lock") {
                return Err(ApiError::Status { status: 500, detail: "boom".to_string() });
            }
            self.calls.lock().expect("lock").push(format!("create:{agency}"));
            self.payloads.lock().expect("lock").push(payload.clone());
            Ok(AssignmentResponse {
                id: "ra-1".to_string(),
                assignment: payload.clone(),
                created_at: None,
                updated_at: None,
            })
        }

        async fn update_assignment(
            &self,
            id: &str,
            payload: &AssignmentPayload,
        ) -> Result<AssignmentResponse, ApiError> {
            if *self.fail_submit.lock().expect("lock") {
                return Err(ApiError::Status { status: 500, detail: "boom".to_string() });
            }
            self.calls.lock().expect("lock").push(format!("update:{id}"));
            self.payloads.lock().expect("lock").push(payload.clone());
            Ok(AssignmentResponse {
                id: id.to_string(),
                assignment: payload.clone(),
                created_at: None,
                updated_at: None,
            })
        }
    }

    #[derive(Default)]
    struct FakeUploader {
        uploaded: Mutex<Vec<String>>,
        fail_on: Mutex<Option<String>>,
    }

    impl FakeUploader {
        fn fail_on(&self, filename: &str) {
            *self.fail_on.lock().expect("lock") = Some(filename.to_string());
        }

        fn clear_failure(&self) {
            *self.fail_on.lock().expect("lock") = None;
        }

        fn uploaded(&self) -> Vec<String> {
            self.uploaded.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl FileUploader for FakeUploader {
        async fn upload(&self, file: FileUpload<'_>) -> anyhow::Result<String> {
            if self.fail_on.lock().expect("lock").as_deref() == Some(file.filename) {
                anyhow::bail!("network unreachable");
            }
            self.uploaded.lock().expect("lock").push(file.filename.to_string());
            Ok(format!("files/{}", file.filename))
        }
    }

    fn controller_with(
        backend: Arc<FakeBackend>,
        uploader: Arc<FakeUploader>,
    ) -> WizardController {
        let mut controller = WizardController::new("district-12", backend, uploader);
        controller.apply(WizardChange::Setup(SetupChange::Name("Quarterly Report".to_string())));
        controller
    }

    fn fixtures() -> (Arc<FakeBackend>, Arc<FakeUploader>, WizardController) {
        let backend = Arc::new(FakeBackend::default());
        let uploader = Arc::new(FakeUploader::default());
        let controller = controller_with(backend.clone(), uploader.clone());
        (backend, uploader, controller)
    }

    async fn walk_to_review(controller: &mut WizardController) {
        for _ in 0..4 {
            match controller.advance().await {
                AdvanceOutcome::Moved(_) => {}
                other => panic!("expected to move, got {other:?}"),
            }
        }
        assert_eq!(controller.step(), WizardStep::Review);
    }

    #[tokio::test]
    async fn setup_blocks_on_empty_name() {
        let backend = Arc::new(FakeBackend::default());
        let uploader = Arc::new(FakeUploader::default());
        let mut controller = WizardController::new("district-12", backend, uploader);

        match controller.advance().await {
            AdvanceOutcome::Blocked(errors) => {
                assert_eq!(errors[0].field, "name");
            }
            other => panic!("expected Blocked, got {other:?}"),
        }
        assert_eq!(controller.step(), WizardStep::Setup);
    }

    #[tokio::test]
    async fn setup_blocks_on_invalid_video_link() {
        let (_, _, mut controller) = fixtures();
        controller
            .apply(WizardChange::Setup(SetupChange::VideoLink(Some("not a url".to_string()))));

        match controller.advance().await {
            AdvanceOutcome::Blocked(errors) => assert_eq!(errors[0].field, "video_link"),
            other => panic!("expected Blocked, got {other:?}"),
        }

        controller.apply(WizardChange::Setup(SetupChange::VideoLink(Some(
            "https://videos.example.com/intro".to_string(),
        ))));
        assert!(matches!(controller.advance().await, AdvanceOutcome::Moved(WizardStep::Schedule)));
    }

    #[tokio::test]
    async fn cover_uploads_before_resources_and_keys_are_committed() {
        let (_, uploader, mut controller) = fixtures();

        controller.attach_cover("cover.png", "image/png", vec![0]).expect("cover accepted");
        controller.attach_resource("plan.pdf", "application/pdf", vec![1]).expect("resource");
        controller.attach_resource("rubric.docx", "application/msword", vec![2]).expect("resource");

        assert_eq!(controller.draft().setup.video_cover.as_deref(), Some(PENDING_PLACEHOLDER));
        assert_eq!(
            controller.draft().setup.file_urls,
            vec![PENDING_PLACEHOLDER.to_string(), PENDING_PLACEHOLDER.to_string()]
        );

        assert!(matches!(controller.advance().await, AdvanceOutcome::Moved(WizardStep::Schedule)));

        assert_eq!(uploader.uploaded(), vec!["cover.png", "plan.pdf", "rubric.docx"]);
        assert_eq!(controller.draft().setup.video_cover.as_deref(), Some("files/cover.png"));
        assert_eq!(
            controller.draft().setup.file_urls,
            vec!["files/plan.pdf".to_string(), "files/rubric.docx".to_string()]
        );
    }

    #[tokio::test]
    async fn upload_failure_halts_the_advance() {
        let (_, uploader, mut controller) = fixtures();
        uploader.fail_on("plan.pdf");

        controller.attach_cover("cover.png", "image/png", vec![0]).expect("cover accepted");
        controller.attach_resource("plan.pdf", "application/pdf", vec![1]).expect("resource");
        controller.attach_resource("rubric.docx", "application/msword", vec![2]).expect("resource");

        match controller.advance().await {
            AdvanceOutcome::UploadFailed { filename, .. } => assert_eq!(filename, "plan.pdf"),
            other => panic!("expected UploadFailed, got {other:?}"),
        }

        assert_eq!(controller.step(), WizardStep::Setup);
        assert_eq!(uploader.uploaded(), vec!["cover.png"]);

        let statuses: Vec<UploadStatus> =
            controller.uploads().resources().iter().map(|file| file.status).collect();
        assert_eq!(statuses, vec![UploadStatus::Error, UploadStatus::Pending]);

        // Retry succeeds and does not re-send the already-uploaded cover.
        uploader.clear_failure();
        assert!(matches!(controller.advance().await, AdvanceOutcome::Moved(WizardStep::Schedule)));
        assert_eq!(uploader.uploaded(), vec!["cover.png", "plan.pdf", "rubric.docx"]);
    }

    #[tokio::test]
    async fn cover_must_be_an_allowed_image() {
        let (_, _, mut controller) = fixtures();

        let err = controller
            .attach_cover("cover.exe", "application/octet-stream", vec![0])
            .expect_err("rejected");
        assert_eq!(err.field, "video_cover");

        let err =
            controller.attach_cover("cover.png", "image/jpeg", vec![0]).expect_err("rejected");
        assert!(err.message.contains("does not match"));
    }

    #[tokio::test]
    async fn resource_count_is_capped() {
        let (_, _, mut controller) = fixtures();
        controller = controller.with_upload_policy(UploadPolicy {
            max_resource_files: 1,
            ..UploadPolicy::default()
        });

        controller.attach_resource("one.pdf", "application/pdf", vec![0]).expect("first");
        let err =
            controller.attach_resource("two.pdf", "application/pdf", vec![1]).expect_err("capped");
        assert_eq!(err.field, "file_urls");
    }

    #[tokio::test]
    async fn backward_navigation_only_from_review() {
        let (_, _, mut controller) = fixtures();

        assert!(!controller.navigate_to(WizardStep::Setup));
        walk_to_review(&mut controller).await;

        assert!(!controller.navigate_to(WizardStep::Review));
        assert!(controller.navigate_to(WizardStep::Schedule));
        assert_eq!(controller.step(), WizardStep::Schedule);

        // Once back on an earlier step, jumping around is off again.
        assert!(!controller.navigate_to(WizardStep::Setup));
    }

    #[tokio::test]
    async fn review_submit_creates_then_updates() {
        let (backend, _, mut controller) = fixtures();
        walk_to_review(&mut controller).await;

        match controller.advance().await {
            AdvanceOutcome::Submitted(response) => assert_eq!(response.id, "ra-1"),
            other => panic!("expected Submitted, got {other:?}"),
        }

        // A later save goes through update with the id returned above.
        match controller.save_and_exit().await {
            AdvanceOutcome::Submitted(response) => assert_eq!(response.id, "ra-1"),
            other => panic!("expected Submitted, got {other:?}"),
        }
        assert_eq!(backend.calls(), vec!["create:district-12", "update:ra-1"]);
    }

    #[tokio::test]
    async fn submit_failure_surfaces_banner_and_preserves_draft() {
        let (backend, _, mut controller) = fixtures();
        controller.apply(WizardChange::Schedule(ScheduleChange::AddDate(
            parse_iso_date("2025-01-15").expect("date"),
        )));
        walk_to_review(&mut controller).await;

        backend.set_fail_submit(true);
        match controller.advance().await {
            AdvanceOutcome::SubmitFailed { banner } => assert!(banner.contains("boom")),
            other => panic!("expected SubmitFailed, got {other:?}"),
        }
        assert_eq!(controller.step(), WizardStep::Review);
        assert!(controller.banner().is_some());
        assert_eq!(controller.draft().schedule.entries.len(), 1);

        backend.set_fail_submit(false);
        match controller.advance().await {
            AdvanceOutcome::Submitted(_) => {}
            other => panic!("expected Submitted, got {other:?}"),
        }
        assert!(controller.banner().is_none());

        let payload = backend.last_payload();
        assert_eq!(payload.schedule.schedule_type, ScheduleType::SpecificDates);
        assert_eq!(payload.schedule.report_names.len(), 1);
    }

    #[tokio::test]
    async fn save_and_exit_flushes_uploads_from_any_step() {
        let (backend, uploader, mut controller) = fixtures();
        controller.attach_resource("plan.pdf", "application/pdf", vec![1]).expect("resource");

        match controller.save_and_exit().await {
            AdvanceOutcome::Submitted(_) => {}
            other => panic!("expected Submitted, got {other:?}"),
        }

        assert_eq!(uploader.uploaded(), vec!["plan.pdf"]);
        let payload = backend.last_payload();
        assert_eq!(payload.file_urls, vec!["files/plan.pdf".to_string()]);
        assert!(!payload.file_urls.contains(&PENDING_PLACEHOLDER.to_string()));
        // Saving does not move the wizard anywhere.
        assert_eq!(controller.step(), WizardStep::Setup);
    }

    #[tokio::test]
    async fn category_creation_adds_the_new_id_to_the_draft() {
        let (_, _, mut controller) = fixtures();

        let category = controller
            .create_category("Compliance", "#1f6f4a")
            .await
            .expect("created")
            .expect("not suppressed");
        assert_eq!(category.id, "cat-1");
        assert!(controller.draft().setup.categories.contains("cat-1"));

        let err = controller.create_category("", "#1f6f4a").await.expect_err("empty name");
        assert!(matches!(err, ApiError::Validation(_)));

        let err = controller.create_category("Ops", "green").await.expect_err("bad color");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn editing_an_existing_assignment_updates_in_place() {
        let backend = Arc::new(FakeBackend::default());
        let uploader = Arc::new(FakeUploader::default());

        let mut seed = controller_with(backend.clone(), uploader.clone());
        seed.apply(WizardChange::Schedule(ScheduleChange::AddDate(
            parse_iso_date("2025-01-15").expect("date"),
        )));
        walk_to_review(&mut seed).await;
        let response = match seed.advance().await {
            AdvanceOutcome::Submitted(response) => *response,
            other => panic!("expected Submitted, got {other:?}"),
        };

        let mut editor =
            WizardController::for_existing("district-12", &response, backend.clone(), uploader);
        assert_eq!(editor.draft().setup.name, "Quarterly Report");
        assert_eq!(editor.draft().schedule.entries.len(), 1);

        walk_to_review(&mut editor).await;
        match editor.advance().await {
            AdvanceOutcome::Submitted(updated) => assert_eq!(updated.id, "ra-1"),
            other => panic!("expected Submitted, got {other:?}"),
        }
        assert_eq!(backend.calls(), vec!["create:district-12", "update:ra-1"]);
    }
}
