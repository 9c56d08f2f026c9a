use std::future::Future;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::ApiError;
use crate::model::{
    CheckAnswerRequest, Credentials, Feedback, NewQuestion, Progress, Question, QuestionId,
    QuestionPage, User,
};
use crate::session::QuizConfig;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Everything the client asks of the question-bank server.
pub trait QuizApi: Send + Sync {
    fn questions(
        &self,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<QuestionPage, ApiError>> + Send;

    fn check_answer(
        &self,
        request: &CheckAnswerRequest,
    ) -> impl Future<Output = Result<Feedback, ApiError>> + Send;

    /// Saved answers of `username`. Anonymous and admin users have none.
    fn user_progress(&self, username: &str)
        -> impl Future<Output = Result<Progress, ApiError>> + Send;

    /// `Ok(None)` when the server rejects the credentials.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Option<User>, ApiError>> + Send;

    /// Fails with [`ApiError::Conflict`] when the name is taken.
    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<User, ApiError>> + Send;

    fn create_question(
        &self,
        question: &NewQuestion,
    ) -> impl Future<Output = Result<Question, ApiError>> + Send;

    fn import_questions(
        &self,
        questions: &[serde_json::Value],
    ) -> impl Future<Output = Result<Vec<Question>, ApiError>> + Send;

    fn delete_question(&self, id: QuestionId) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn chapters(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    fn quiz_questions(
        &self,
        config: &QuizConfig,
    ) -> impl Future<Output = Result<Vec<Question>, ApiError>> + Send;
}

/// reqwest-backed client. No retries, no caching.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base: Url) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }
}

async fn expect_json<T: DeserializeOwned>(
    response: Response,
    context: &'static str,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        warn!("{}: server returned {}", context, status);
        return Err(ApiError::Status { context, status });
    }
    Ok(response.json().await?)
}

impl QuizApi for HttpApi {
    #[instrument(skip(self))]
    async fn questions(&self, page: u32, size: u32) -> Result<QuestionPage, ApiError> {
        let url = self.endpoint("questions")?;
        let response = self
            .client
            .get(url)
            .query(&[("page", page), ("size", size)])
            .send()
            .await?;
        expect_json(response, "Failed to fetch questions").await
    }

    #[instrument(skip(self), fields(question = request.question_id))]
    async fn check_answer(&self, request: &CheckAnswerRequest) -> Result<Feedback, ApiError> {
        let url = self.endpoint("check-answer")?;
        let response = self.client.post(url).json(request).send().await?;
        expect_json(response, "Failed to check answer").await
    }

    #[instrument(skip(self))]
    async fn user_progress(&self, username: &str) -> Result<Progress, ApiError> {
        if username.is_empty() || username == "admin" {
            return Ok(Progress::new());
        }
        let mut url = self.endpoint("user")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(username)
            .push("progress");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            debug!("no progress for {}: {}", username, response.status());
            return Ok(Progress::new());
        }
        Ok(response.json().await?)
    }

    #[instrument(skip_all, fields(user = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> Result<Option<User>, ApiError> {
        let url = self.endpoint("login")?;
        let response = self.client.post(url).json(credentials).send().await?;
        if !response.status().is_success() {
            debug!("login rejected: {}", response.status());
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    #[instrument(skip_all, fields(user = %credentials.username))]
    async fn register(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let url = self.endpoint("register")?;
        let response = self.client.post(url).json(credentials).send().await?;
        if response.status() == StatusCode::CONFLICT {
            return Err(ApiError::Conflict);
        }
        expect_json(response, "Registration failed").await
    }

    #[instrument(skip_all)]
    async fn create_question(&self, question: &NewQuestion) -> Result<Question, ApiError> {
        let url = self.endpoint("admin/questions")?;
        let response = self.client.post(url).json(question).send().await?;
        expect_json(response, "Failed to post question").await
    }

    #[instrument(skip_all, fields(count = questions.len()))]
    async fn import_questions(
        &self,
        questions: &[serde_json::Value],
    ) -> Result<Vec<Question>, ApiError> {
        let url = self.endpoint("admin/questions/bulk")?;
        let response = self.client.post(url).json(questions).send().await?;
        expect_json(response, "Failed to bulk post questions").await
    }

    #[instrument(skip(self))]
    async fn delete_question(&self, id: QuestionId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("admin/questions/{}", id))?;
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                context: "Failed to delete question",
                status,
            });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn chapters(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint("quiz/chapters")?;
        let response = self.client.get(url).send().await?;
        expect_json(response, "Failed to fetch chapters").await
    }

    #[instrument(skip(self))]
    async fn quiz_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, ApiError> {
        let url = self.endpoint("quiz/questions")?;
        let chapters = config
            .chapters
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(",");
        let response = self
            .client
            .get(url)
            .query(&[
                ("count", config.count.get().to_string()),
                ("chapters", chapters),
            ])
            .send()
            .await?;
        expect_json(response, "Failed to load quiz").await
    }
}
