#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use reqwest::StatusCode;
use termbank::api::QuizApi;
use termbank::error::ApiError;
use termbank::model::{
    CheckAnswerRequest, Credentials, Feedback, NewQuestion, Progress, Question, QuestionId,
    QuestionPage, Stats, User,
};
use termbank::event::{perform, Command};
use termbank::session::QuizConfig;
use termbank::state::AppState;

pub fn question(id: QuestionId, correct: usize) -> Question {
    Question {
        id,
        text: format!("Question number {}", id),
        code_snippet: None,
        options: vec!["one".into(), "two".into(), "three".into(), "four".into()],
        correct_index: Some(correct),
        correct_indices: Vec::new(),
        explanation: Some(format!("Explanation {}", id)),
        answer_explanations: Vec::new(),
        chapter: Some("Basics".into()),
    }
}

pub fn multi_question(id: QuestionId, correct: &[usize]) -> Question {
    Question {
        text: format!("Question {}: select all that apply", id),
        correct_index: None,
        correct_indices: correct.to_vec(),
        ..question(id, 0)
    }
}

pub fn server_error(context: &'static str) -> ApiError {
    ApiError::Status {
        context,
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// In-memory question bank. Records every call so tests can assert on what
/// was (or was not) requested.
#[derive(Default)]
pub struct FakeApi {
    pub pages: Vec<Vec<Question>>,
    pub quiz_pool: Vec<Question>,
    pub chapters: Vec<String>,
    pub users: Mutex<HashMap<String, (String, bool)>>,
    pub progress: HashMap<String, Progress>,
    /// Questions whose checks fail with a server error.
    pub failing_checks: HashSet<QuestionId>,
    pub offline: bool,
    pub calls: Mutex<Vec<String>>,
    pub checks: Mutex<Vec<CheckAnswerRequest>>,
    pub created: Mutex<Vec<NewQuestion>>,
}

impl FakeApi {
    pub fn with_pages(pages: Vec<Vec<Question>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_quiz(pool: Vec<Question>) -> Self {
        Self {
            quiz_pool: pool,
            chapters: vec!["Basics".into(), "Collections".into()],
            ..Self::default()
        }
    }

    pub fn add_user(&self, name: &str, password: &str, admin: bool) {
        self.users
            .lock()
            .unwrap()
            .insert(name.to_string(), (password.to_string(), admin));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| *c == name).count()
    }

    pub fn check_count(&self) -> usize {
        self.checks.lock().unwrap().len()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn find(&self, id: QuestionId) -> Option<Question> {
        self.pages
            .iter()
            .flatten()
            .chain(self.quiz_pool.iter())
            .find(|q| q.id == id)
            .cloned()
    }
}

fn judge(question: &Question, request: &CheckAnswerRequest) -> Feedback {
    let correct = match (&request.selected_indices, request.selected_option_index) {
        (Some(picked), _) => {
            let picked: BTreeSet<usize> = picked.iter().copied().collect();
            let expected: BTreeSet<usize> = question.correct_indices.iter().copied().collect();
            picked == expected
        }
        (None, Some(i)) => question.correct_index == Some(i),
        (None, None) => false,
    };
    let mut counts = BTreeMap::new();
    counts.insert(question.correct_index.unwrap_or(0), 3);
    Feedback {
        correct,
        correct_index: question.correct_index,
        correct_indices: question.correct_indices.clone(),
        explanation: question.explanation.clone(),
        answer_explanations: Vec::new(),
        stats: Some(Stats { total: 4, counts }),
    }
}

impl QuizApi for FakeApi {
    async fn questions(&self, page: u32, _size: u32) -> Result<QuestionPage, ApiError> {
        self.record("questions");
        if self.offline {
            return Err(server_error("Failed to fetch questions"));
        }
        Ok(QuestionPage {
            content: self.pages.get(page as usize).cloned().unwrap_or_default(),
            total_pages: self.pages.len() as u32,
        })
    }

    async fn check_answer(&self, request: &CheckAnswerRequest) -> Result<Feedback, ApiError> {
        self.record("check_answer");
        self.checks.lock().unwrap().push(request.clone());
        if self.offline || self.failing_checks.contains(&request.question_id) {
            return Err(server_error("Failed to check answer"));
        }
        match self.find(request.question_id) {
            Some(q) => Ok(judge(&q, request)),
            None => Err(ApiError::Status {
                context: "Failed to check answer",
                status: StatusCode::NOT_FOUND,
            }),
        }
    }

    async fn user_progress(&self, username: &str) -> Result<Progress, ApiError> {
        self.record("user_progress");
        Ok(self.progress.get(username).cloned().unwrap_or_default())
    }

    async fn login(&self, credentials: &Credentials) -> Result<Option<User>, ApiError> {
        self.record("login");
        if self.offline {
            return Err(server_error("Login failed"));
        }
        let users = self.users.lock().unwrap();
        Ok(match users.get(&credentials.username) {
            Some((password, admin)) if *password == credentials.password => Some(User {
                id: serde_json::json!(1),
                name: credentials.username.clone(),
                is_admin: *admin,
            }),
            _ => None,
        })
    }

    async fn register(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.record("register");
        if self.offline {
            return Err(server_error("Registration failed"));
        }
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&credentials.username) {
            return Err(ApiError::Conflict);
        }
        users.insert(
            credentials.username.clone(),
            (credentials.password.clone(), false),
        );
        Ok(User {
            id: serde_json::json!(users.len()),
            name: credentials.username.clone(),
            is_admin: false,
        })
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<Question, ApiError> {
        self.record("create_question");
        if self.offline {
            return Err(server_error("Failed to post question"));
        }
        self.created.lock().unwrap().push(question.clone());
        Ok(Question {
            id: 1000,
            text: question.text.clone(),
            code_snippet: question.code_snippet.clone(),
            options: question.options.clone(),
            correct_index: question.correct_index.or(Some(0)),
            correct_indices: Vec::new(),
            explanation: question.explanation.clone(),
            answer_explanations: Vec::new(),
            chapter: None,
        })
    }

    async fn import_questions(
        &self,
        questions: &[serde_json::Value],
    ) -> Result<Vec<Question>, ApiError> {
        self.record("import_questions");
        if self.offline {
            return Err(server_error("Failed to bulk post questions"));
        }
        Ok((0..questions.len() as i64)
            .map(|i| question(2000 + i, 0))
            .collect())
    }

    async fn delete_question(&self, _id: QuestionId) -> Result<(), ApiError> {
        self.record("delete_question");
        if self.offline {
            return Err(server_error("Failed to delete question"));
        }
        Ok(())
    }

    async fn chapters(&self) -> Result<Vec<String>, ApiError> {
        self.record("chapters");
        Ok(self.chapters.clone())
    }

    async fn quiz_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, ApiError> {
        self.record("quiz_questions");
        if self.offline {
            return Err(server_error("Failed to load quiz"));
        }
        Ok(self
            .quiz_pool
            .iter()
            .filter(|q| {
                q.chapter
                    .as_ref()
                    .is_some_and(|c| config.chapters.contains(c))
            })
            .take(config.count.get() as usize)
            .cloned()
            .collect())
    }
}

/// Run commands to completion against `api`, feeding results back into the
/// state the way the terminal loop does. Returns the countdown commands seen.
pub async fn drive(state: &mut AppState, api: &FakeApi, commands: Vec<Command>) -> Vec<Command> {
    let mut queue: std::collections::VecDeque<Command> = commands.into();
    let mut countdown = Vec::new();
    while let Some(command) = queue.pop_front() {
        match command {
            Command::StartCountdown | Command::StopCountdown => countdown.push(command),
            other => {
                if let Some(event) = perform(api, other).await {
                    queue.extend(state.apply(event));
                }
            }
        }
    }
    countdown
}
