use std::collections::BTreeSet;

use time::Date;

use crate::schedule::{add_specific_date, generate_recurring_dates, reconcile, remove_specific_date};
use crate::schemas::assignment::{AssignmentPayload, ContentBlock};
use crate::schemas::schedule::{
    PeriodUnit, RecurrenceRule, ReportNameEntry, SchedulePayload, ScheduleType,
};
use crate::schemas::scoring::ScoringRubric;
use crate::schemas::submission::{
    Question, QuestionKind, QuestionOption, SubmissionInstruction, SubmissionType,
};

#[derive(Debug, Clone, Default)]
pub struct SetupState {
    pub name: String,
    pub description: String,
    pub categories: BTreeSet<String>,
    pub content_blocks: [ContentBlock; 3],
    pub video_link: Option<String>,
    pub video_cover: Option<String>,
    pub file_urls: Vec<String>,
    pub school_year: Option<String>,
    pub completion_time: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleState {
    pub schedule_type: ScheduleType,
    pub specific_dates: Vec<Date>,
    pub recurrence: RecurrenceRule,
    pub entries: Vec<ReportNameEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    pub kind: SubmissionType,
    pub auto_accept: bool,
    pub accepted_files: Vec<String>,
    pub allow_submission: bool,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringState {
    pub exempt: bool,
}

#[derive(Debug, Clone)]
pub enum SetupChange {
    Name(String),
    Description(String),
    AddCategory(String),
    RemoveCategory(String),
    ContentBlockTitle { index: usize, title: String },
    ContentBlockDescription { index: usize, description: String },
    VideoLink(Option<String>),
    SchoolYear(Option<String>),
    CompletionTime(Option<String>),
}

#[derive(Debug, Clone)]
pub enum ScheduleChange {
    Type(ScheduleType),
    AddDate(Date),
    RemoveDate(Date),
    FirstOccurrence(Option<Date>),
    Interval(Option<u32>),
    Period(Option<PeriodUnit>),
    OccurrenceCount(Option<u32>),
    RenameEntry { date: Date, report_name: String },
}

#[derive(Debug, Clone)]
pub enum SubmissionChange {
    Kind(SubmissionType),
    AutoAccept(bool),
    AllowSubmission(bool),
    AddAcceptedFile(String),
    RemoveAcceptedFile(String),
    AddQuestion { prompt: String, kind: QuestionKind },
    RemoveQuestion { id: String },
    QuestionPrompt { id: String, prompt: String },
    QuestionKind { id: String, kind: QuestionKind },
    QuestionAllowSubmission { id: String, allow: bool },
    AddQuestionFile { id: String, extension: String },
    RemoveQuestionFile { id: String, extension: String },
    AddOption { question_id: String, text: String },
    RemoveOption { question_id: String, option_id: String },
    OptionText { question_id: String, option_id: String, text: String },
}

#[derive(Debug, Clone)]
pub enum ScoringChange {
    Exempt(bool),
}

#[derive(Debug, Clone)]
pub enum WizardChange {
    Setup(SetupChange),
    Schedule(ScheduleChange),
    Submission(SubmissionChange),
    Scoring(ScoringChange),
}

/// The in-progress assignment. Every field edit lands here immediately;
/// nothing waits for a step transition, and nothing is persisted until the
/// final create/update call.
#[derive(Debug, Clone, Default)]
pub struct AssignmentDraft {
    pub setup: SetupState,
    pub schedule: ScheduleState,
    pub submission: SubmissionState,
    pub scoring: ScoringState,
}

impl AssignmentDraft {
    pub fn apply(&mut self, change: WizardChange) {
        match change {
            WizardChange::Setup(change) => self.apply_setup(change),
            WizardChange::Schedule(change) => self.apply_schedule(change),
            WizardChange::Submission(change) => self.apply_submission(change),
            WizardChange::Scoring(change) => self.apply_scoring(change),
        }
    }

    pub fn apply_setup(&mut self, change: SetupChange) {
        match change {
            SetupChange::Name(name) => self.setup.name = name,
            SetupChange::Description(description) => self.setup.description = description,
            SetupChange::AddCategory(id) => {
                self.setup.categories.insert(id);
            }
            SetupChange::RemoveCategory(id) => {
                self.setup.categories.remove(&id);
            }
            SetupChange::ContentBlockTitle { index, title } => {
                if let Some(block) = self.setup.content_blocks.get_mut(index) {
                    block.title = title;
                }
            }
            SetupChange::ContentBlockDescription { index, description } => {
                if let Some(block) = self.setup.content_blocks.get_mut(index) {
                    block.description = description;
                }
            }
            SetupChange::VideoLink(link) => self.setup.video_link = link,
            SetupChange::SchoolYear(year) => self.setup.school_year = year,
            SetupChange::CompletionTime(estimate) => self.setup.completion_time = estimate,
        }
    }

    /// Schedule edits re-derive the name-entry list on every change; for
    /// the recurring branch that derived list is the schedule.
    pub fn apply_schedule(&mut self, change: ScheduleChange) {
        let specific = self.schedule.schedule_type == ScheduleType::SpecificDates;
        match change {
            ScheduleChange::Type(new_type) => {
                if new_type == self.schedule.schedule_type {
                    return;
                }
                self.schedule.schedule_type = new_type;
                self.schedule.entries.clear();
                // Recurrence parameters are reset when leaving the
                // recurring branch; the specific-date list is retained
                // either way.
                if new_type == ScheduleType::SpecificDates {
                    self.schedule.recurrence = RecurrenceRule::default();
                }
            }
            ScheduleChange::AddDate(date) => {
                if !specific || !add_specific_date(&mut self.schedule.specific_dates, date) {
                    return;
                }
            }
            ScheduleChange::RemoveDate(date) => {
                if !specific || !remove_specific_date(&mut self.schedule.specific_dates, date) {
                    return;
                }
            }
            ScheduleChange::FirstOccurrence(date) => {
                if specific {
                    return;
                }
                self.schedule.recurrence.first_occurrence = date;
            }
            ScheduleChange::Interval(interval) => {
                if specific {
                    return;
                }
                self.schedule.recurrence.interval = interval;
            }
            ScheduleChange::Period(period) => {
                if specific {
                    return;
                }
                self.schedule.recurrence.period = period;
            }
            ScheduleChange::OccurrenceCount(count) => {
                if specific {
                    return;
                }
                self.schedule.recurrence.occurrence_count = count;
            }
            ScheduleChange::RenameEntry { date, report_name } => {
                if let Some(entry) =
                    self.schedule.entries.iter_mut().find(|entry| entry.date == date)
                {
                    entry.report_name = report_name;
                }
                return;
            }
        }
        self.reconcile_entries();
    }

    pub fn apply_submission(&mut self, change: SubmissionChange) {
        match change {
            // Switching the type keeps the other branches' sub-state in
            // memory; it just stops being serialized (the instruction is
            // rebuilt from the active branch at payload time).
            SubmissionChange::Kind(kind) => self.submission.kind = kind,
            SubmissionChange::AutoAccept(auto_accept) => self.submission.auto_accept = auto_accept,
            SubmissionChange::AllowSubmission(allow) => self.submission.allow_submission = allow,
            SubmissionChange::AddAcceptedFile(extension) => {
                if !self.submission.accepted_files.contains(&extension) {
                    self.submission.accepted_files.push(extension);
                }
            }
            SubmissionChange::RemoveAcceptedFile(extension) => {
                self.submission.accepted_files.retain(|existing| *existing != extension);
            }
            SubmissionChange::AddQuestion { prompt, kind } => {
                self.submission.questions.push(Question::new(prompt, kind));
            }
            SubmissionChange::RemoveQuestion { id } => {
                self.submission.questions.retain(|question| question.id != id);
            }
            SubmissionChange::QuestionPrompt { id, prompt } => {
                if let Some(question) = self.question_mut(&id) {
                    question.prompt = prompt;
                }
            }
            SubmissionChange::QuestionKind { id, kind } => {
                if let Some(question) = self.question_mut(&id) {
                    question.kind = kind;
                }
            }
            SubmissionChange::QuestionAllowSubmission { id, allow } => {
                if let Some(question) = self.question_mut(&id) {
                    question.allow_submission = allow;
                }
            }
            SubmissionChange::AddQuestionFile { id, extension } => {
                if let Some(question) = self.question_mut(&id) {
                    if !question.accepted_files.contains(&extension) {
                        question.accepted_files.push(extension);
                    }
                }
            }
            SubmissionChange::RemoveQuestionFile { id, extension } => {
                if let Some(question) = self.question_mut(&id) {
                    question.accepted_files.retain(|existing| *existing != extension);
                }
            }
            SubmissionChange::AddOption { question_id, text } => {
                if let Some(question) = self.question_mut(&question_id) {
                    question.options.push(QuestionOption::new(text));
                }
            }
            SubmissionChange::RemoveOption { question_id, option_id } => {
                if let Some(question) = self.question_mut(&question_id) {
                    question.options.retain(|option| option.id != option_id);
                }
            }
            SubmissionChange::OptionText { question_id, option_id, text } => {
                if let Some(question) = self.question_mut(&question_id) {
                    if let Some(option) =
                        question.options.iter_mut().find(|option| option.id == option_id)
                    {
                        option.text = text;
                    }
                }
            }
        }
    }

    pub fn apply_scoring(&mut self, change: ScoringChange) {
        match change {
            ScoringChange::Exempt(exempt) => self.scoring.exempt = exempt,
        }
    }

    fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.submission.questions.iter_mut().find(|question| question.id == id)
    }

    fn reconcile_entries(&mut self) {
        let dates = match self.schedule.schedule_type {
            ScheduleType::SpecificDates => self.schedule.specific_dates.clone(),
            ScheduleType::RecurringDates => generate_recurring_dates(&self.schedule.recurrence),
        };
        self.schedule.entries = reconcile(&self.setup.name, &dates, &self.schedule.entries);
    }

    /// Assemble the wire aggregate from the active branches only.
    pub fn to_payload(&self) -> AssignmentPayload {
        let submission = match self.submission.kind {
            SubmissionType::CertificateOnly => {
                SubmissionInstruction::certificate_only(self.submission.auto_accept)
            }
            SubmissionType::DefaultResponse => SubmissionInstruction::default_response(
                self.submission.accepted_files.clone(),
                self.submission.allow_submission,
            ),
            SubmissionType::ResponseRequired => {
                SubmissionInstruction::response_required(self.submission.questions.clone())
            }
        };

        AssignmentPayload {
            name: self.setup.name.clone(),
            description: self.setup.description.clone(),
            categories: self.setup.categories.iter().cloned().collect(),
            content_blocks: self.setup.content_blocks.to_vec(),
            video_link: self.setup.video_link.clone(),
            video_cover: self.setup.video_cover.clone(),
            file_urls: self.setup.file_urls.clone(),
            school_year: self.setup.school_year.clone(),
            completion_time: self.setup.completion_time.clone(),
            schedule: SchedulePayload {
                schedule_type: self.schedule.schedule_type,
                report_names: self.schedule.entries.clone(),
                recurrence: match self.schedule.schedule_type {
                    ScheduleType::RecurringDates => Some(self.schedule.recurrence.clone()),
                    ScheduleType::SpecificDates => None,
                },
            },
            submission,
            scoring: if self.scoring.exempt { None } else { Some(ScoringRubric::default()) },
        }
    }

    /// Rebuild wizard state from a persisted assignment for editing.
    pub fn from_payload(payload: &AssignmentPayload) -> Self {
        let mut content_blocks: [ContentBlock; 3] = Default::default();
        for (slot, block) in content_blocks.iter_mut().zip(payload.content_blocks.iter()) {
            *slot = block.clone();
        }

        let entries = payload.schedule.report_names.clone();
        let specific_dates = match payload.schedule.schedule_type {
            ScheduleType::SpecificDates => entries.iter().map(|entry| entry.date).collect(),
            ScheduleType::RecurringDates => Vec::new(),
        };

        Self {
            setup: SetupState {
                name: payload.name.clone(),
                description: payload.description.clone(),
                categories: payload.categories.iter().cloned().collect(),
                content_blocks,
                video_link: payload.video_link.clone(),
                video_cover: payload.video_cover.clone(),
                file_urls: payload.file_urls.clone(),
                school_year: payload.school_year.clone(),
                completion_time: payload.completion_time.clone(),
            },
            schedule: ScheduleState {
                schedule_type: payload.schedule.schedule_type,
                specific_dates,
                recurrence: payload.schedule.recurrence.clone().unwrap_or_default(),
                entries,
            },
            submission: SubmissionState {
                kind: payload.submission.kind,
                auto_accept: payload.submission.auto_accept,
                accepted_files: payload.submission.accepted_files.clone(),
                allow_submission: payload.submission.allow_submission,
                questions: payload.submission.questions.clone(),
            },
            scoring: ScoringState { exempt: payload.scoring.is_none() },
        }
    }
}
