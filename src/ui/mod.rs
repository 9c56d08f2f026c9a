pub mod admin;
pub mod dialog;
pub mod keybar;
pub mod layout;
pub mod login;
pub mod markdown;
pub mod question;
pub mod result;
pub mod setup;
pub mod sidebar;
pub mod statusbar;
pub mod titlebar;

use ratatui::Frame;

use crate::session::Phase;
use crate::state::{AppState, Screen};

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, state);

    match state.screen {
        Screen::Browse => draw_browse(f, &layout, state),
        Screen::Login => login::draw_login(f, layout.body, state),
        Screen::Quiz => match state.session.phase {
            Phase::Setup => setup::draw_setup(f, layout.body, state),
            Phase::Active | Phase::Submitted => draw_quiz(f, &layout, state),
        },
        Screen::AdminForm => admin::draw_question_form(f, layout.body, state),
        Screen::BulkImport => admin::draw_bulk_import(f, layout.body, state),
    }

    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);

    // Draw dialog overlay if any
    if state.has_dialog() {
        dialog::draw_dialog(f, area, state);
    }
}

fn draw_browse(f: &mut Frame, layout: &layout::AppLayout, state: &AppState) {
    sidebar::draw_browser_sidebar(f, layout.sidebar, state);

    let main = if state.browser.all_answered() {
        let (banner, rest) = layout::split_banner(layout.main, 3);
        result::draw_completion_banner(f, banner, state);
        rest
    } else {
        layout.main
    };

    match state.current_browser_question() {
        Some(q) => question::draw_card(f, main, &state.browser_card(q), state.question_scroll),
        None => question::draw_empty(f, main, state),
    }
}

fn draw_quiz(f: &mut Frame, layout: &layout::AppLayout, state: &AppState) {
    sidebar::draw_quiz_sidebar(f, layout.sidebar, state);

    let main = if state.session.phase == Phase::Submitted {
        let (banner, rest) = layout::split_banner(layout.main, 4);
        result::draw_quiz_result(f, banner, state);
        rest
    } else {
        layout.main
    };

    if let Some(q) = state.current_quiz_question() {
        question::draw_card(f, main, &state.quiz_card(q), state.question_scroll);
    }
}
