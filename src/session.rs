//! Timed, chapter-scoped quiz: Setup -> Active -> Submitted.

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api::QuizApi;
use crate::error::{ApiError, InputError};
use crate::model::{CheckAnswerRequest, Feedback, Question, QuestionId, Selection};

/// Seconds on the clock per question.
pub const SECONDS_PER_QUESTION: i64 = 60;

/// Allowed quiz lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionCount {
    Ten,
    #[default]
    Fifteen,
    Twenty,
    Thirty,
}

impl QuestionCount {
    pub const ALL: [QuestionCount; 4] = [
        QuestionCount::Ten,
        QuestionCount::Fifteen,
        QuestionCount::Twenty,
        QuestionCount::Thirty,
    ];

    pub fn get(self) -> u32 {
        match self {
            QuestionCount::Ten => 10,
            QuestionCount::Fifteen => 15,
            QuestionCount::Twenty => 20,
            QuestionCount::Thirty => 30,
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizConfig {
    pub chapters: BTreeSet<String>,
    pub count: QuestionCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Active,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Manual,
    Auto,
}

/// Result of checking every quiz answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grading {
    pub feedback: HashMap<QuestionId, Feedback>,
    pub score: usize,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    pub phase: Phase,
    pub available_chapters: Vec<String>,
    pub config: QuizConfig,
    pub questions: Vec<Question>,
    pub answers: HashMap<QuestionId, Selection>,
    pub feedback: HashMap<QuestionId, Feedback>,
    pub score: usize,
    pub remaining_seconds: i64,
    pub error: Option<String>,
    pub loading: bool,
    pub grading: bool,
    pub submit_kind: Option<SubmitKind>,
    pub submitted_at: Option<chrono::DateTime<chrono::Local>>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Setup,
            available_chapters: Vec::new(),
            config: QuizConfig::default(),
            questions: Vec::new(),
            answers: HashMap::new(),
            feedback: HashMap::new(),
            score: 0,
            remaining_seconds: 0,
            error: None,
            loading: false,
            grading: false,
            submit_kind: None,
            submitted_at: None,
        }
    }

    pub fn set_chapters(&mut self, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(chapters) => {
                self.config.chapters.retain(|c| chapters.contains(c));
                self.available_chapters = chapters;
            }
            Err(e) => {
                warn!("cannot load chapters: {}", e);
                self.error = Some(format!("Cannot load chapters: {}", e));
            }
        }
    }

    pub fn toggle_chapter(&mut self, chapter: &str) {
        if self.phase != Phase::Setup {
            return;
        }
        if !self.config.chapters.remove(chapter) {
            self.config.chapters.insert(chapter.to_string());
        }
    }

    pub fn set_count(&mut self, count: QuestionCount) {
        if self.phase == Phase::Setup {
            self.config.count = count;
        }
    }

    /// Validate the setup and mark a fetch as in flight. Returns the config to
    /// fetch with, or None when nothing should be requested.
    pub fn begin_start(&mut self) -> Option<QuizConfig> {
        if self.phase != Phase::Setup || self.loading {
            return None;
        }
        if self.config.chapters.is_empty() {
            self.error = Some(InputError::NoChapters.to_string());
            return None;
        }
        self.error = None;
        self.loading = true;
        Some(self.config.clone())
    }

    /// Forget an in-flight fetch so its result is dropped when it lands.
    pub fn abandon_start(&mut self) {
        if self.loading {
            debug!("quiz fetch abandoned");
            self.loading = false;
        }
    }

    /// Apply the fetched question set. Returns true when the quiz went Active.
    /// A result for an abandoned fetch is ignored.
    pub fn finish_start(&mut self, result: Result<Vec<Question>, ApiError>) -> bool {
        if !self.loading {
            debug!("dropping quiz set for an abandoned start");
            return false;
        }
        self.loading = false;
        match result {
            Ok(questions) if !questions.is_empty() => {
                info!(count = questions.len(), "quiz started");
                self.remaining_seconds = self.config.count.get() as i64 * SECONDS_PER_QUESTION;
                self.questions = questions;
                self.answers.clear();
                self.feedback.clear();
                self.score = 0;
                self.submit_kind = None;
                self.submitted_at = None;
                self.phase = Phase::Active;
                true
            }
            Ok(_) => {
                self.error = Some("No questions available for the selected chapters".to_string());
                false
            }
            Err(e) => {
                warn!("failed to load quiz: {}", e);
                self.error = Some(format!("Failed to load quiz: {}", e));
                false
            }
        }
    }

    pub async fn start<A: QuizApi>(&mut self, api: &A) -> bool {
        let Some(config) = self.begin_start() else {
            return false;
        };
        let result = api.quiz_questions(&config).await;
        self.finish_start(result)
    }

    fn is_open(&self) -> bool {
        self.phase == Phase::Active && !self.grading
    }

    /// Pick option `idx`. Single-select replaces, multi-select toggles.
    pub fn select(&mut self, question_id: QuestionId, idx: usize) {
        if !self.is_open() {
            return;
        }
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            return;
        };
        if idx >= question.options.len() {
            return;
        }
        if question.is_multi_select() {
            let entry = self
                .answers
                .entry(question_id)
                .or_insert_with(|| Selection::Multi(BTreeSet::new()));
            if let Selection::Multi(set) = entry {
                if !set.remove(&idx) {
                    set.insert(idx);
                }
            }
        } else {
            self.answers.insert(question_id, Selection::Single(idx));
        }
    }

    /// One second passed. Returns true on the tick that runs the clock out,
    /// which is the caller's cue to submit automatically.
    pub fn tick(&mut self) -> bool {
        if !self.is_open() || self.remaining_seconds <= 0 {
            return false;
        }
        self.remaining_seconds -= 1;
        self.remaining_seconds == 0
    }

    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|s| !s.is_empty()).count()
    }

    /// Lock the quiz and build one check request per question. None when the
    /// quiz is not Active or a submission is already under way.
    pub fn begin_submit(
        &mut self,
        kind: SubmitKind,
        username: Option<&str>,
    ) -> Option<Vec<CheckAnswerRequest>> {
        if !self.is_open() {
            return None;
        }
        info!(?kind, answered = self.answered_count(), "submitting quiz");
        self.phase = Phase::Submitted;
        self.grading = true;
        self.submit_kind = Some(kind);
        self.submitted_at = Some(chrono::Local::now());
        Some(
            self.questions
                .iter()
                .map(|q| {
                    let selection = self.answers.get(&q.id).filter(|s| !s.is_empty());
                    CheckAnswerRequest::new(q.id, selection, username)
                })
                .collect(),
        )
    }

    pub fn finish_submit(&mut self, grading: Grading) {
        self.grading = false;
        self.score = grading.score;
        self.feedback = grading.feedback;
    }

    pub async fn submit<A: QuizApi>(
        &mut self,
        api: &A,
        kind: SubmitKind,
        username: Option<&str>,
    ) -> bool {
        let Some(requests) = self.begin_submit(kind, username) else {
            return false;
        };
        let grading = grade(api, requests).await;
        self.finish_submit(grading);
        true
    }

    /// Leave an unsubmitted quiz; answers are discarded.
    pub fn quit(&mut self) {
        if self.phase == Phase::Active && !self.grading {
            info!("quiz abandoned");
            self.reset();
        }
    }

    /// Back to Setup with every session field cleared. Only the chapter list
    /// fetched from the server is kept.
    pub fn reset(&mut self) {
        let available = std::mem::take(&mut self.available_chapters);
        *self = Self::new();
        self.available_chapters = available;
    }

    pub fn is_read_only(&self) -> bool {
        self.phase == Phase::Submitted
    }
}

/// Check every answer concurrently. Failed checks leave no feedback and do
/// not count towards the score.
pub async fn grade<A: QuizApi>(api: &A, requests: Vec<CheckAnswerRequest>) -> Grading {
    let checks = requests.into_iter().map(|request| async move {
        let result = api.check_answer(&request).await;
        (request.question_id, result)
    });

    let mut grading = Grading::default();
    for (id, result) in join_all(checks).await {
        match result {
            Ok(feedback) => {
                if feedback.correct {
                    grading.score += 1;
                }
                grading.feedback.insert(id, feedback);
            }
            Err(e) => warn!(question = id, "check failed: {}", e),
        }
    }
    grading
}
