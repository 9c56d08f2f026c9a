mod common;

use common::{drive, FakeApi};
use termbank::admin::{parse_bulk, FormField, QuestionForm};
use termbank::error::InputError;
use termbank::state::{AppState, Dialog, Screen};

fn filled_form() -> QuestionForm {
    QuestionForm {
        text: "What does `Vec::new` allocate?".into(),
        options: [
            "Nothing".into(),
            "One page".into(),
            "Eight bytes".into(),
            "Depends".into(),
        ],
        ..QuestionForm::default()
    }
}

async fn admin_state(api: &FakeApi) -> AppState {
    api.add_user("root", "pw", true);
    let mut state = AppState::new(10);
    let commands = state.startup(Some("root"), Some("pw"));
    drive(&mut state, api, commands).await;
    assert!(state.auth.is_admin());
    state
}

#[test]
fn test_form_requires_text_and_options() {
    let mut form = filled_form();
    form.text = "   ".into();
    assert!(matches!(form.to_payload(), Err(InputError::MissingField(_))));

    let mut form = filled_form();
    form.options[3].clear();
    assert!(matches!(form.to_payload(), Err(InputError::MissingField(_))));
}

#[test]
fn test_form_payload_omits_blank_extras() {
    let mut form = filled_form();
    let payload = form.to_payload().unwrap();
    assert_eq!(payload.correct_index, None);
    assert_eq!(payload.code_snippet, None);
    assert_eq!(payload.explanation, None);

    form.cycle_correct_index();
    form.cycle_correct_index();
    form.code_snippet = "let v: Vec<u8> = Vec::new();\n".into();
    let payload = form.to_payload().unwrap();
    assert_eq!(payload.correct_index, Some(1));
    assert_eq!(payload.code_snippet.as_deref(), Some("let v: Vec<u8> = Vec::new();"));
}

#[test]
fn test_correct_index_cycles_back_to_auto() {
    let mut form = QuestionForm::default();
    for _ in 0..5 {
        form.cycle_correct_index();
    }
    assert_eq!(form.correct_index, None);
    assert_eq!(form.field(FormField::CorrectIndex), "Auto-detect (AI)");
}

#[test]
fn test_field_order_wraps() {
    assert_eq!(FormField::Text.prev(), FormField::Explanation);
    assert_eq!(FormField::Code.next(), FormField::Option(0));
    assert_eq!(FormField::Explanation.next(), FormField::Text);
}

#[test]
fn test_parse_bulk_accepts_only_arrays() {
    assert_eq!(parse_bulk(r#"[{"text":"a"},{"text":"b"}]"#).unwrap().len(), 2);
    assert!(matches!(parse_bulk(r#"{"text":"a"}"#), Err(InputError::NotAnArray)));
    assert!(matches!(parse_bulk("not json"), Err(InputError::Json(_))));
}

#[tokio::test]
async fn test_non_array_bulk_makes_no_request() {
    let api = FakeApi::default();
    let mut state = admin_state(&api).await;

    state.open_bulk_import();
    assert_eq!(state.screen, Screen::BulkImport);
    state.insert_text(r#"{"text": "lonely"}"#);
    let commands = state.submit_bulk();

    assert!(commands.is_empty());
    assert_eq!(state.bulk.status, "Error: Input must be a JSON array of questions.");
    assert_eq!(api.call_count("import_questions"), 0);
}

#[tokio::test]
async fn test_bulk_import_success_reloads() {
    let api = FakeApi::default();
    let mut state = admin_state(&api).await;

    state.open_bulk_import();
    state.insert_text(r#"[{"text":"a"},{"text":"b"},{"text":"c"}]"#);
    let commands = state.submit_bulk();
    assert!(state.bulk.in_flight);
    let loads_before = api.call_count("questions");
    drive(&mut state, &api, commands).await;

    assert_eq!(
        state.top_dialog(),
        Some(&Dialog::Alert("Bulk import successful: 3 questions".to_string()))
    );
    assert_eq!(state.screen, Screen::Browse);
    assert!(state.bulk.input.is_empty());
    assert_eq!(api.call_count("questions"), loads_before + 1);
}

#[tokio::test]
async fn test_posted_question_is_appended() {
    let api = FakeApi::default();
    let mut state = admin_state(&api).await;

    state.open_admin_form();
    assert_eq!(state.screen, Screen::AdminForm);
    state.admin_form = filled_form();
    let commands = state.submit_admin_form();
    assert!(state.admin_form.submitting);
    // a second submit while posting is ignored
    assert!(state.submit_admin_form().is_empty());
    drive(&mut state, &api, commands).await;

    assert_eq!(api.created.lock().unwrap().len(), 1);
    assert_eq!(state.browser.questions.last().map(|q| q.id), Some(1000));
    assert_eq!(state.screen, Screen::Browse);
    assert!(state.admin_form.text.is_empty());
}

#[tokio::test]
async fn test_failed_post_alerts_and_keeps_form() {
    let api = FakeApi::default();
    let mut state = admin_state(&api).await;
    state.open_admin_form();
    state.admin_form = filled_form();

    let commands = state.submit_admin_form();
    let offline = FakeApi {
        offline: true,
        ..FakeApi::default()
    };
    drive(&mut state, &offline, commands).await;

    assert_eq!(
        state.top_dialog(),
        Some(&Dialog::Alert("Failed to post question".to_string()))
    );
    assert_eq!(state.screen, Screen::AdminForm);
    assert!(!state.admin_form.text.is_empty());
    assert!(!state.admin_form.submitting);
}

#[tokio::test]
async fn test_authoring_is_admin_only() {
    let mut state = AppState::new(10);
    state.open_admin_form();
    assert_eq!(state.screen, Screen::Browse);
    state.open_bulk_import();
    assert_eq!(state.screen, Screen::Browse);
}
