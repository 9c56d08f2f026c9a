use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::admin::FormField;
use crate::api::QuizApi;
use crate::auth::AuthMode;
use crate::card::label_index;
use crate::event::{perform, AppEvent, Command};
use crate::session::Phase;
use crate::state::*;
use crate::timer::Countdown;

/// Runs commands off the UI loop and owns the countdown ticker.
struct Executor<A> {
    api: Arc<A>,
    runtime: Handle,
    tx: UnboundedSender<AppEvent>,
    countdown: Option<Countdown>,
}

impl<A: QuizApi + 'static> Executor<A> {
    fn run(&mut self, commands: Vec<Command>) {
        for command in commands {
            debug!(?command, "dispatch");
            match command {
                Command::StartCountdown => {
                    self.countdown = Some(Countdown::start(&self.runtime, self.tx.clone(), || {
                        AppEvent::Tick
                    }));
                }
                Command::StopCountdown => {
                    self.countdown = None;
                }
                other => {
                    let api = Arc::clone(&self.api);
                    let tx = self.tx.clone();
                    self.runtime.spawn(async move {
                        if let Some(event) = perform(api.as_ref(), other).await {
                            let _ = tx.send(event);
                        }
                    });
                }
            }
        }
    }
}

pub fn run_tui<A: QuizApi + 'static>(
    mut state: AppState,
    api: Arc<A>,
    runtime: Handle,
    initial: Vec<Command>,
) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Cannot enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .map_err(|e| format!("Cannot enter alternate screen: {}", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Cannot create terminal: {}", e))?;

    let (tx, rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut executor = Executor {
        api,
        runtime,
        tx,
        countdown: None,
    };
    executor.run(initial);

    let result = main_loop(&mut terminal, &mut state, rx, &mut executor);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste).ok();

    result
}

fn main_loop<A: QuizApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut rx: UnboundedReceiver<AppEvent>,
    executor: &mut Executor<A>,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|f| crate::ui::draw(f, state))
            .map_err(|e| format!("Draw error: {}", e))?;

        if state.should_quit {
            break;
        }

        // Poll for input events
        if event::poll(Duration::from_millis(100)).map_err(|e| format!("Poll error: {}", e))? {
            match event::read().map_err(|e| format!("Read error: {}", e))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let commands = handle_key(key, state);
                    executor.run(commands);
                }
                Event::Paste(text) => {
                    if !state.has_dialog() {
                        state.insert_text(&text);
                    }
                }
                _ => {}
            }
        }

        // Handle finished requests and timer ticks
        while let Ok(ev) = rx.try_recv() {
            let commands = state.apply(ev);
            executor.run(commands);
        }
    }

    Ok(())
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    // Handle dialog keys first
    if state.has_dialog() {
        return handle_dialog_key(key, state);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('q') {
        state.push_dialog(Dialog::ConfirmExit);
        return Vec::new();
    }

    match state.screen {
        Screen::Browse => handle_browse_key(key, state),
        Screen::Login => handle_login_key(key, state),
        Screen::Quiz => handle_quiz_key(key, state),
        Screen::AdminForm => handle_admin_key(key, state),
        Screen::BulkImport => handle_bulk_key(key, state),
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    let is_confirm = matches!(
        state.top_dialog(),
        Some(
            Dialog::ConfirmSubmit
                | Dialog::ConfirmQuitQuiz
                | Dialog::ConfirmDelete(_)
                | Dialog::ConfirmExit
        )
    );
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') if is_confirm => state.confirm_dialog(),
        KeyCode::Esc | KeyCode::Char('n') if is_confirm => {
            state.cancel_dialog();
            Vec::new()
        }
        KeyCode::Enter | KeyCode::Esc if !is_confirm => state.confirm_dialog(),
        _ => Vec::new(),
    }
}

fn navigate_prev(state: &mut AppState) {
    let idx = state.current_index();
    if idx > 0 {
        state.navigate_to(idx - 1);
    }
}

fn navigate_next(state: &mut AppState) {
    let idx = state.current_index();
    state.navigate_to(idx + 1);
}

fn handle_browse_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        match key.code {
            KeyCode::Char('l') => {
                if state.auth.user.is_some() {
                    state.logout();
                } else {
                    state.open_login(AuthMode::Login);
                }
            }
            KeyCode::Char('r') => {
                if state.auth.user.is_none() {
                    state.open_login(AuthMode::Register);
                }
            }
            KeyCode::Char('t') => return state.open_quiz(),
            KeyCode::Char('n') => state.open_admin_form(),
            KeyCode::Char('b') => state.open_bulk_import(),
            KeyCode::Char('d') => state.request_delete_current(),
            KeyCode::Char('o') => {
                if state.browser.all_answered() {
                    return state.restart_browser();
                }
            }
            KeyCode::Char('s') => return state.browser_submit_multi(),
            _ => {}
        }
        return Vec::new();
    }

    match key.code {
        KeyCode::Up => navigate_prev(state),
        KeyCode::Down => navigate_next(state),
        KeyCode::Home => state.navigate_to(0),
        KeyCode::End => {
            let last = state.browser.questions.len().saturating_sub(1);
            state.navigate_to(last);
        }
        KeyCode::Left | KeyCode::PageUp => {
            let changed = state.browser.prev_page();
            return state.change_page(changed);
        }
        KeyCode::Right | KeyCode::PageDown => {
            let changed = state.browser.next_page();
            return state.change_page(changed);
        }
        KeyCode::Char(c @ '1'..='9') => {
            let page = c.to_digit(10).unwrap_or(1) - 1;
            let changed = state.browser.goto_page(page);
            return state.change_page(changed);
        }
        KeyCode::Enter => return state.browser_submit_multi(),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        KeyCode::Char(c) => {
            if let Some(idx) = label_index(c) {
                return state.browser_pick(idx);
            }
        }
        KeyCode::Esc => state.push_dialog(Dialog::ConfirmExit),
        _ => {}
    }
    Vec::new()
}

fn handle_login_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('r') if ctrl => state.toggle_auth_mode(),
        KeyCode::Char(c) if !ctrl => state.insert_text(&c.to_string()),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            state.login_focus = match state.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Username,
            };
        }
        KeyCode::Enter => match state.login_focus {
            LoginFocus::Username => state.login_focus = LoginFocus::Password,
            LoginFocus::Password => return state.submit_auth(),
        },
        KeyCode::Esc => state.screen = Screen::Browse,
        _ => {}
    }
    Vec::new()
}

fn handle_quiz_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    match state.session.phase {
        Phase::Setup => handle_setup_key(key, state),
        Phase::Active => handle_active_quiz_key(key, state),
        Phase::Submitted => {
            match key.code {
                KeyCode::Up => navigate_prev(state),
                KeyCode::Down => navigate_next(state),
                KeyCode::Enter | KeyCode::Esc => state.request_quiz_quit(),
                KeyCode::Char('?') => state.push_dialog(Dialog::Help),
                _ => {}
            }
            Vec::new()
        }
    }
}

fn handle_setup_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    let chapters = state.session.available_chapters.len();
    match key.code {
        KeyCode::Up => {
            state.setup_cursor = state.setup_cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            if state.setup_cursor + 1 < chapters {
                state.setup_cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(chapter) = state.session.available_chapters.get(state.setup_cursor).cloned()
            {
                state.session.toggle_chapter(&chapter);
            }
        }
        KeyCode::Left => {
            let count = state.session.config.count.prev();
            state.session.set_count(count);
        }
        KeyCode::Right => {
            let count = state.session.config.count.next();
            state.session.set_count(count);
        }
        KeyCode::Char('r') => return vec![Command::LoadChapters],
        KeyCode::Enter => return state.start_quiz(),
        KeyCode::Esc => state.request_quiz_quit(),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => {}
    }
    Vec::new()
}

fn handle_active_quiz_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => state.request_quiz_submit(),
        KeyCode::Up => navigate_prev(state),
        KeyCode::Down | KeyCode::Enter => navigate_next(state),
        KeyCode::Home => state.navigate_to(0),
        KeyCode::End => {
            let last = state.session.questions.len().saturating_sub(1);
            state.navigate_to(last);
        }
        KeyCode::Esc => state.request_quiz_quit(),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        KeyCode::Char(c) if !ctrl => {
            if let Some(idx) = label_index(c) {
                state.quiz_pick(idx);
            }
        }
        _ => {}
    }
    Vec::new()
}

fn handle_admin_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let field = state.form_field;
    match key.code {
        KeyCode::Char('s') if ctrl => return state.submit_admin_form(),
        KeyCode::Tab => state.form_field = field.next(),
        KeyCode::BackTab => state.form_field = field.prev(),
        KeyCode::Esc => state.screen = Screen::Browse,
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right if field == FormField::CorrectIndex => {
            state.admin_form.cycle_correct_index();
        }
        KeyCode::Enter => {
            if field.is_multiline() {
                state.insert_text("\n");
            } else {
                state.form_field = field.next();
            }
        }
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) if !ctrl => state.insert_text(&c.to_string()),
        _ => {}
    }
    Vec::new()
}

fn handle_bulk_key(key: KeyEvent, state: &mut AppState) -> Vec<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => return state.submit_bulk(),
        KeyCode::Esc => state.screen = Screen::Browse,
        KeyCode::Enter => state.insert_text("\n"),
        KeyCode::Tab => state.insert_text("  "),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) if !ctrl => state.insert_text(&c.to_string()),
        _ => {}
    }
    Vec::new()
}
