use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::session::Phase;
use crate::state::{AppState, Screen};

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &AppState) {
    let bindings: Vec<(&str, &str)> = match state.screen {
        Screen::Browse => {
            let mut b = vec![
                ("a-z", "answer"),
                ("↑/↓", "question"),
                ("←/→", "page"),
                ("Enter", "submit multi"),
                ("Ctrl+T", "quiz"),
            ];
            if state.auth.is_admin() {
                b.extend([("Ctrl+N", "new"), ("Ctrl+B", "bulk"), ("Ctrl+D", "delete")]);
            }
            if state.auth.user.is_some() {
                b.push(("Ctrl+L", "logout"));
            } else {
                b.extend([("Ctrl+L", "login"), ("Ctrl+R", "sign up")]);
            }
            if state.browser.all_answered() {
                b.push(("Ctrl+O", "restart"));
            }
            b.push(("Ctrl+Q", "quit"));
            b
        }
        Screen::Login => vec![
            ("Tab", "next field"),
            ("Enter", "confirm"),
            ("Ctrl+R", "login/sign up"),
            ("Esc", "back"),
        ],
        Screen::Quiz => match state.session.phase {
            Phase::Setup => vec![
                ("↑/↓", "chapter"),
                ("Space", "toggle"),
                ("←/→", "count"),
                ("Enter", "start"),
                ("r", "reload"),
                ("Esc", "back"),
            ],
            Phase::Active => vec![
                ("a-z", "select"),
                ("↑/↓", "prev/next"),
                ("Ctrl+S", "submit"),
                ("Esc", "quit quiz"),
            ],
            Phase::Submitted => vec![("↑/↓", "review"), ("Enter", "new quiz")],
        },
        Screen::AdminForm => vec![
            ("Tab", "next field"),
            ("Space", "correct option"),
            ("Ctrl+S", "post"),
            ("Esc", "cancel"),
        ],
        Screen::BulkImport => vec![("paste", "JSON array"), ("Ctrl+S", "upload"), ("Esc", "cancel")],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
