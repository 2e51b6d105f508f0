use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionType {
    #[default]
    CertificateOnly,
    DefaultResponse,
    ResponseRequired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Text,
    SingleChoice,
    MultipleChoice,
    Document,
}

impl QuestionKind {
    pub fn has_options(self) -> bool {
        matches!(self, QuestionKind::SingleChoice | QuestionKind::MultipleChoice)
    }

    pub fn accepts_files(self) -> bool {
        matches!(self, QuestionKind::Document)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
}

impl QuestionOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, alias = "acceptedFiles")]
    pub accepted_files: Vec<String>,
    #[serde(default, alias = "allowSubmission")]
    pub allow_submission: bool,
}

impl Question {
    pub fn new(prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            kind,
            options: Vec::new(),
            accepted_files: Vec::new(),
            allow_submission: false,
        }
    }

    /// Drop sub-state that does not apply to the question's kind, so stale
    /// edits from a previous kind never reach the wire.
    pub(crate) fn sanitized(mut self) -> Self {
        if !self.kind.has_options() {
            self.options.clear();
        }
        if !self.kind.accepts_files() {
            self.accepted_files.clear();
        }
        self
    }
}

/// What a school must hand in for each report. The wire object is always
/// rebuilt from the current type plus only the sub-state that type owns;
/// everything else serializes empty or false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInstruction {
    #[serde(rename = "type")]
    pub kind: SubmissionType,
    #[serde(default, alias = "autoAccept")]
    pub auto_accept: bool,
    #[serde(default, alias = "acceptedFiles")]
    pub accepted_files: Vec<String>,
    #[serde(default, alias = "allowSubmission")]
    pub allow_submission: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl SubmissionInstruction {
    pub fn certificate_only(auto_accept: bool) -> Self {
        Self {
            kind: SubmissionType::CertificateOnly,
            auto_accept,
            accepted_files: Vec::new(),
            allow_submission: false,
            questions: Vec::new(),
        }
    }

    pub fn default_response(accepted_files: Vec<String>, allow_submission: bool) -> Self {
        Self {
            kind: SubmissionType::DefaultResponse,
            auto_accept: false,
            accepted_files,
            allow_submission,
            questions: Vec::new(),
        }
    }

    pub fn response_required(questions: Vec<Question>) -> Self {
        Self {
            kind: SubmissionType::ResponseRequired,
            auto_accept: false,
            accepted_files: Vec::new(),
            allow_submission: false,
            questions: questions.into_iter().map(Question::sanitized).collect(),
        }
    }
}
