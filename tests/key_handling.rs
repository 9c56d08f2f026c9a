mod common;

use common::{drive, multi_question, question, FakeApi};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use termbank::event::Command;
use termbank::session::Phase;
use termbank::state::{AppState, Dialog, Screen};
use termbank::tui::handle_key;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

async fn loaded_state(api: &FakeApi) -> AppState {
    let mut state = AppState::new(10);
    let commands = state.startup(None, None);
    drive(&mut state, api, commands).await;
    state
}

#[tokio::test]
async fn test_letter_answers_single_select() {
    let api = FakeApi::with_pages(vec![vec![question(1, 1), question(2, 0)]]);
    let mut state = loaded_state(&api).await;

    let commands = handle_key(key(KeyCode::Char('b')), &mut state);
    assert!(matches!(commands.as_slice(), [Command::CheckAnswer(r)] if r.selected_option_index == Some(1)));
    drive(&mut state, &api, commands).await;
    assert_eq!(state.browser.score, 1);

    // locked now
    assert!(handle_key(key(KeyCode::Char('a')), &mut state).is_empty());

    handle_key(key(KeyCode::Down), &mut state);
    assert_eq!(state.current_question, 1);
    // letters past the last option do nothing
    assert!(handle_key(key(KeyCode::Char('z')), &mut state).is_empty());
}

#[tokio::test]
async fn test_multi_select_needs_enter() {
    let api = FakeApi::with_pages(vec![vec![multi_question(1, &[0, 3])]]);
    let mut state = loaded_state(&api).await;

    assert!(handle_key(key(KeyCode::Char('a')), &mut state).is_empty());
    assert!(handle_key(key(KeyCode::Char('d')), &mut state).is_empty());
    let commands = handle_key(key(KeyCode::Enter), &mut state);
    assert_eq!(commands.len(), 1);
    drive(&mut state, &api, commands).await;
    assert!(state.browser.answers[&1].feedback.correct);
}

#[tokio::test]
async fn test_page_keys() {
    let pages = (0..3).map(|p| vec![question(p * 10 + 1, 0)]).collect();
    let api = FakeApi::with_pages(pages);
    let mut state = loaded_state(&api).await;

    let commands = handle_key(key(KeyCode::Right), &mut state);
    assert_eq!(commands, vec![Command::LoadPage { page: 1, size: 10 }]);
    drive(&mut state, &api, commands).await;
    assert_eq!(state.browser.questions[0].id, 11);

    let commands = handle_key(key(KeyCode::Char('3')), &mut state);
    assert_eq!(commands, vec![Command::LoadPage { page: 2, size: 10 }]);
    drive(&mut state, &api, commands).await;

    // already on the last page
    assert!(handle_key(key(KeyCode::Right), &mut state).is_empty());
    assert!(handle_key(key(KeyCode::Char('9')), &mut state).is_empty());
}

#[tokio::test]
async fn test_quiz_keys() {
    let api = FakeApi::with_quiz((1..=3).map(|id| question(id, 0)).collect());
    let mut state = loaded_state(&api).await;

    let commands = handle_key(ctrl('t'), &mut state);
    assert_eq!(state.screen, Screen::Quiz);
    drive(&mut state, &api, commands).await;

    // Enter with nothing ticked shows the error and fetches nothing
    assert!(handle_key(key(KeyCode::Enter), &mut state).is_empty());
    assert_eq!(state.session.error.as_deref(), Some("Select at least one chapter"));

    handle_key(key(KeyCode::Char(' ')), &mut state);
    handle_key(key(KeyCode::Left), &mut state);
    let commands = handle_key(key(KeyCode::Enter), &mut state);
    drive(&mut state, &api, commands).await;
    assert_eq!(state.session.phase, Phase::Active);

    handle_key(key(KeyCode::Char('a')), &mut state);
    handle_key(ctrl('s'), &mut state);
    assert_eq!(state.top_dialog(), Some(&Dialog::ConfirmSubmit));
    let commands = handle_key(key(KeyCode::Enter), &mut state);
    drive(&mut state, &api, commands).await;
    assert_eq!(state.session.phase, Phase::Submitted);
    assert_eq!(state.session.score, 1);

    handle_key(key(KeyCode::Enter), &mut state);
    assert_eq!(state.session.phase, Phase::Setup);
}

#[tokio::test]
async fn test_ctrl_q_asks_first() {
    let api = FakeApi::default();
    let mut state = loaded_state(&api).await;

    handle_key(ctrl('q'), &mut state);
    assert_eq!(state.top_dialog(), Some(&Dialog::ConfirmExit));
    handle_key(key(KeyCode::Esc), &mut state);
    assert!(!state.should_quit);

    handle_key(ctrl('q'), &mut state);
    handle_key(key(KeyCode::Enter), &mut state);
    assert!(state.should_quit);
}
