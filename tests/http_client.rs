use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use termbank::api::{HttpApi, QuizApi};
use termbank::config::normalize_base_url;
use termbank::error::ApiError;
use termbank::model::{CheckAnswerRequest, Credentials, Selection};
use termbank::session::{QuestionCount, QuizConfig};

#[derive(Clone, Default)]
struct Hits {
    progress: Arc<AtomicUsize>,
}

fn sample_question(id: i64) -> Value {
    json!({
        "id": id,
        "text": format!("Question {}", id),
        "options": ["a", "b", "c", "d"],
        "correctIndex": 1,
        "correctIndices": null,
        "explanation": null,
        "chapter": "Basics"
    })
}

async fn questions(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let page: i64 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(-1);
    let size: i64 = q.get("size").and_then(|p| p.parse().ok()).unwrap_or(-1);
    Json(json!({
        "content": (0..size).map(|i| sample_question(page * 100 + i)).collect::<Vec<_>>(),
        "totalPages": 4,
        "totalElements": 40
    }))
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "taken" {
        return (StatusCode::CONFLICT, Json(json!({"error": "exists"})));
    }
    (
        StatusCode::OK,
        Json(json!({"id": 7, "name": body["username"], "isAdmin": false})),
    )
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] != "secret" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "nope"})));
    }
    (
        StatusCode::OK,
        Json(json!({"id": "u-1", "name": body["username"], "isAdmin": true})),
    )
}

async fn progress(State(hits): State<Hits>, Path(name): Path<String>) -> Json<Value> {
    hits.progress.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "3": {"selectedIndex": 1, "feedback": {"correct": true, "correctIndex": 1}},
        "4": {"selectedIndices": [0, 2], "feedback": {"correct": false, "correctIndices": [0, 1]}},
        "9": {"selectedIndex": 0, "feedback": {"correct": name == "ann bee"}}
    }))
}

async fn check(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "correct": body["selectedOptionIndex"] == 1,
        "correctIndex": 1,
        "explanation": body.to_string(),
        "stats": {"total": 2, "counts": {"1": 2}}
    }))
}

async fn quiz(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let count: i64 = q.get("count").and_then(|c| c.parse().ok()).unwrap_or(0);
    let chapters = q.get("chapters").cloned().unwrap_or_default();
    let questions: Vec<Value> = (0..count)
        .map(|i| {
            let mut q = sample_question(i);
            q["chapter"] = json!(chapters);
            q
        })
        .collect();
    Json(Value::Array(questions))
}

async fn remove(Path(id): Path<i64>) -> StatusCode {
    if id == 13 {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn serve() -> (HttpApi, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/api/questions", get(questions))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/user/:name/progress", get(progress))
        .route("/api/check-answer", post(check))
        .route("/api/quiz/questions", get(quiz))
        .route("/api/quiz/chapters", get(|| async { Json(json!(["Basics", "Traits"])) }))
        .route("/api/admin/questions/:id", delete(remove))
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // no /api suffix on purpose
    let base = normalize_base_url(&format!("http://{}", addr)).unwrap();
    (HttpApi::new(base).unwrap(), hits)
}

fn creds(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn test_questions_page() {
    let (api, _) = serve().await;
    let page = api.questions(2, 3).await.unwrap();
    assert_eq!(page.total_pages, 4);
    let ids: Vec<_> = page.content.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![200, 201, 202]);
    assert!(page.content[0].correct_indices.is_empty());
}

#[tokio::test]
async fn test_register_conflict() {
    let (api, _) = serve().await;
    let err = api.register(&creds("taken", "pw")).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict));
    assert_eq!(err.to_string(), "Username already taken");

    let user = api.register(&creds("fresh", "pw")).await.unwrap();
    assert_eq!(user.name, "fresh");
}

#[tokio::test]
async fn test_login_rejection_is_not_an_error() {
    let (api, _) = serve().await;
    assert!(api.login(&creds("ann", "wrong")).await.unwrap().is_none());
    let user = api.login(&creds("ann", "secret")).await.unwrap().unwrap();
    assert!(user.is_admin);
}

#[tokio::test]
async fn test_progress_skips_anonymous_and_admin() {
    let (api, hits) = serve().await;
    assert!(api.user_progress("").await.unwrap().is_empty());
    assert!(api.user_progress("admin").await.unwrap().is_empty());
    assert_eq!(hits.progress.load(Ordering::SeqCst), 0);

    // names are escaped into a single path segment
    let progress = api.user_progress("ann bee").await.unwrap();
    assert_eq!(hits.progress.load(Ordering::SeqCst), 1);
    assert_eq!(progress.len(), 3);
    assert!(progress[&9].feedback.correct);

    let record = progress[&4].clone().into_record();
    assert_eq!(record.selection, Selection::Multi([0, 2].into_iter().collect()));
    let record = progress[&3].clone().into_record();
    assert_eq!(record.selection, Selection::Single(1));
}

#[tokio::test]
async fn test_check_answer_body() {
    let (api, _) = serve().await;
    let request = CheckAnswerRequest::new(5, Some(&Selection::Single(1)), Some("ann"));
    let feedback = api.check_answer(&request).await.unwrap();
    assert!(feedback.correct);
    assert_eq!(feedback.stats.unwrap().percent(1), Some(100));

    let sent: Value = serde_json::from_str(feedback.explanation.as_deref().unwrap()).unwrap();
    assert_eq!(
        sent,
        json!({"questionId": 5, "selectedOptionIndex": 1, "username": "ann"})
    );
}

#[tokio::test]
async fn test_quiz_query() {
    let (api, _) = serve().await;
    assert_eq!(api.chapters().await.unwrap(), vec!["Basics", "Traits"]);

    let config = QuizConfig {
        chapters: ["Traits".to_string(), "Basics".to_string()].into_iter().collect(),
        count: QuestionCount::Ten,
    };
    let questions = api.quiz_questions(&config).await.unwrap();
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[0].chapter.as_deref(), Some("Basics,Traits"));
}

#[tokio::test]
async fn test_delete_status() {
    let (api, _) = serve().await;
    assert!(api.delete_question(4).await.is_ok());
    let err = api.delete_question(13).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ..
        }
    ));
}
