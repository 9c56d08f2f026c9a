//! Messages between the UI loop and the background request tasks.

use crate::api::QuizApi;
use crate::error::ApiError;
use crate::model::{
    CheckAnswerRequest, Credentials, Feedback, NewQuestion, Progress, Question, QuestionId,
    QuestionPage, User,
};
use crate::session::{grade, Grading, QuizConfig};

/// Work the UI loop asks for. Requests run off the loop; countdown commands
/// start or stop the ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadPage { page: u32, size: u32 },
    LoadProgress(String),
    CheckAnswer(CheckAnswerRequest),
    Login(Credentials),
    Register(Credentials),
    LoadChapters,
    StartQuiz(QuizConfig),
    GradeQuiz(Vec<CheckAnswerRequest>),
    CreateQuestion(NewQuestion),
    ImportQuestions(Vec<serde_json::Value>),
    DeleteQuestion(QuestionId),
    StartCountdown,
    StopCountdown,
}

/// Results coming back to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    PageLoaded {
        page: u32,
        result: Result<QuestionPage, ApiError>,
    },
    ProgressLoaded(Result<Progress, ApiError>),
    AnswerChecked {
        request: CheckAnswerRequest,
        result: Result<Feedback, ApiError>,
    },
    LoggedIn(Result<Option<User>, ApiError>),
    Registered(Result<User, ApiError>),
    ChaptersLoaded(Result<Vec<String>, ApiError>),
    QuizLoaded(Result<Vec<Question>, ApiError>),
    QuizGraded(Grading),
    QuestionCreated(Result<Question, ApiError>),
    QuestionsImported(Result<Vec<Question>, ApiError>),
    QuestionDeleted {
        id: QuestionId,
        result: Result<(), ApiError>,
    },
    Tick,
}

/// Run one request command against the API and wrap its result. Countdown
/// commands are handled by the loop itself and yield nothing here.
pub async fn perform<A: QuizApi>(api: &A, command: Command) -> Option<AppEvent> {
    let event = match command {
        Command::LoadPage { page, size } => AppEvent::PageLoaded {
            page,
            result: api.questions(page, size).await,
        },
        Command::LoadProgress(username) => AppEvent::ProgressLoaded(api.user_progress(&username).await),
        Command::CheckAnswer(request) => {
            let result = api.check_answer(&request).await;
            AppEvent::AnswerChecked { request, result }
        }
        Command::Login(credentials) => AppEvent::LoggedIn(api.login(&credentials).await),
        Command::Register(credentials) => AppEvent::Registered(api.register(&credentials).await),
        Command::LoadChapters => AppEvent::ChaptersLoaded(api.chapters().await),
        Command::StartQuiz(config) => AppEvent::QuizLoaded(api.quiz_questions(&config).await),
        Command::GradeQuiz(requests) => AppEvent::QuizGraded(grade(api, requests).await),
        Command::CreateQuestion(question) => {
            AppEvent::QuestionCreated(api.create_question(&question).await)
        }
        Command::ImportQuestions(items) => {
            AppEvent::QuestionsImported(api.import_questions(&items).await)
        }
        Command::DeleteQuestion(id) => AppEvent::QuestionDeleted {
            id,
            result: api.delete_question(id).await,
        },
        Command::StartCountdown | Command::StopCountdown => return None,
    };
    Some(event)
}
