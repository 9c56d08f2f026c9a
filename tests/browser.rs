mod common;

use std::collections::HashMap;

use common::{drive, multi_question, question, FakeApi};
use termbank::browser::Browser;
use termbank::event::Command;
use termbank::model::{Feedback, Progress, SavedAnswer, Selection};
use termbank::state::{AppState, Dialog};

fn two_pages() -> Vec<Vec<termbank::model::Question>> {
    vec![
        vec![question(1, 0), question(2, 1), multi_question(3, &[0, 2])],
        vec![question(4, 2)],
    ]
}

fn saved(index: usize, correct: bool) -> SavedAnswer {
    SavedAnswer {
        selected_index: Some(index),
        selected_indices: Vec::new(),
        feedback: Feedback {
            correct,
            correct_index: Some(0),
            ..Feedback::default()
        },
    }
}

#[tokio::test]
async fn test_load_and_page_navigation() {
    let api = FakeApi::with_pages(two_pages());
    let mut browser = Browser::new(10);
    browser.load(&api).await;

    assert_eq!(browser.questions.len(), 3);
    assert_eq!(browser.total_pages, 2);
    assert!(!browser.prev_page());
    assert!(browser.next_page());
    browser.load(&api).await;
    assert_eq!(browser.questions[0].id, 4);
    assert!(!browser.next_page());
    assert!(!browser.goto_page(5));
}

#[test]
fn test_stale_page_is_ignored() {
    let mut browser = Browser::new(10);
    browser.total_pages = 3;
    let (first, _) = browser.begin_load();
    assert!(browser.goto_page(2));
    browser.begin_load();

    browser.apply_page(
        first,
        Ok(termbank::model::QuestionPage {
            content: vec![question(1, 0)],
            total_pages: 3,
        }),
    );
    assert!(browser.questions.is_empty());
    assert!(browser.loading);
}

#[tokio::test]
async fn test_failed_load_shows_empty_list() {
    let api = FakeApi {
        offline: true,
        ..FakeApi::with_pages(two_pages())
    };
    let mut browser = Browser::new(10);
    browser.load(&api).await;
    assert!(browser.questions.is_empty());
    assert!(!browser.loading);
    // no page count known, so there is nowhere to jump to
    assert!(!browser.goto_page(3));
    assert_eq!(browser.page, 0);
}

#[tokio::test]
async fn test_answer_locks_question() {
    let api = FakeApi::with_pages(two_pages());
    let mut browser = Browser::new(10);
    browser.load(&api).await;

    assert!(browser.answer(&api, 1, Selection::Single(0), Some("ann")).await);
    assert_eq!(browser.score, 1);

    // a second pick is a no-op and makes no request
    assert!(!browser.answer(&api, 1, Selection::Single(2), Some("ann")).await);
    assert_eq!(api.check_count(), 1);
    assert_eq!(browser.answers[&1].selection, Selection::Single(0));

    assert!(browser.answer(&api, 2, Selection::Single(3), None).await);
    assert_eq!(browser.score, 1);
    assert!(!browser.answers[&2].feedback.correct);

    let checks = api.checks.lock().unwrap();
    assert_eq!(checks[0].username.as_deref(), Some("ann"));
    assert_eq!(checks[1].username, None);
}

#[tokio::test]
async fn test_failed_check_stays_answerable() {
    let mut api = FakeApi::with_pages(two_pages());
    api.failing_checks.insert(1);
    let mut browser = Browser::new(10);
    browser.load(&api).await;

    assert!(!browser.answer(&api, 1, Selection::Single(0), None).await);
    assert!(!browser.is_locked(1));
    assert!(browser.pending.is_empty());
}

#[tokio::test]
async fn test_multi_select_draft_then_submit() {
    let api = FakeApi::with_pages(two_pages());
    let mut browser = Browser::new(10);
    browser.load(&api).await;

    // empty drafts are not sent
    assert!(browser.answer_request(3, None, None).is_none());

    browser.toggle_draft(3, 0);
    browser.toggle_draft(3, 1);
    browser.toggle_draft(3, 2);
    browser.toggle_draft(3, 1);
    let request = browser.answer_request(3, None, None).unwrap();
    assert_eq!(request.selected_indices, Some(vec![0, 2]));
    assert_eq!(request.selected_option_index, None);

    let result = termbank::api::QuizApi::check_answer(&api, &request).await;
    browser.finish_answer(&request, result);
    assert!(browser.answers[&3].feedback.correct);

    browser.toggle_draft(3, 1);
    assert_eq!(
        browser.selection(3),
        Some(Selection::Multi([0, 2].into_iter().collect()))
    );
}

#[tokio::test]
async fn test_saved_progress_sets_score() {
    let api = FakeApi::with_pages(two_pages());
    let mut browser = Browser::new(10);
    browser.load(&api).await;

    let progress: Progress = HashMap::from([(1, saved(0, true)), (2, saved(0, false)), (4, saved(2, true))]);
    browser.merge_progress(progress);

    assert_eq!(browser.score, 2);
    assert!(browser.is_locked(1));
    assert!(browser.is_locked(2));
    assert_eq!(browser.answered_on_page(), 2);
    assert!(!browser.all_answered());
}

#[tokio::test]
async fn test_login_merges_progress_and_restart_clears() {
    let mut api = FakeApi::with_pages(two_pages());
    api.progress.insert(
        "ann".to_string(),
        HashMap::from([(1, saved(0, true)), (2, saved(1, true))]),
    );
    api.add_user("ann", "pw", false);

    let mut state = AppState::new(10);
    let commands = state.startup(Some("ann"), Some("pw"));
    drive(&mut state, &api, commands).await;
    assert_eq!(state.browser.score, 2);

    state.navigate_to(2);
    state.browser.toggle_draft(3, 0);
    state.browser.toggle_draft(3, 2);
    let commands = state.browser_submit_multi();
    drive(&mut state, &api, commands).await;
    assert!(state.browser.all_answered());
    assert_eq!(state.browser.score, 3);

    let commands = state.restart_browser();
    assert!(commands.contains(&Command::LoadProgress("ann".to_string())));
    assert_eq!(state.browser.score, 0);
    assert!(state.browser.answers.is_empty());
    drive(&mut state, &api, commands).await;
    assert_eq!(state.browser.score, 2);
}

#[tokio::test]
async fn test_admin_delete_after_confirmation() {
    let api = FakeApi::with_pages(two_pages());
    api.add_user("root", "pw", true);
    let mut state = AppState::new(10);
    let commands = state.startup(Some("root"), Some("pw"));
    drive(&mut state, &api, commands).await;
    assert!(state.auth.is_admin());
    // admins have no saved progress
    assert_eq!(api.call_count("user_progress"), 0);

    state.navigate_to(1);
    state.request_delete_current();
    assert_eq!(state.top_dialog(), Some(&Dialog::ConfirmDelete(2)));
    assert_eq!(api.call_count("delete_question"), 0);

    let commands = state.confirm_dialog();
    drive(&mut state, &api, commands).await;
    assert_eq!(api.call_count("delete_question"), 1);
    let ids: Vec<_> = state.browser.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_non_admin_cannot_delete() {
    let api = FakeApi::with_pages(two_pages());
    let mut state = AppState::new(10);
    let commands = state.startup(None, None);
    drive(&mut state, &api, commands).await;

    state.request_delete_current();
    assert!(!state.has_dialog());
}

#[tokio::test]
async fn test_failed_delete_alerts() {
    let api = FakeApi::with_pages(two_pages());
    let mut state = AppState::new(10);
    let commands = state.startup(None, None);
    drive(&mut state, &api, commands).await;

    let commands = state.apply(termbank::event::AppEvent::QuestionDeleted {
        id: 1,
        result: Err(common::server_error("Failed to delete question")),
    });
    assert!(commands.is_empty());
    assert_eq!(
        state.top_dialog(),
        Some(&Dialog::Alert("Failed to delete question".to_string()))
    );
    assert_eq!(state.browser.questions.len(), 3);
}
