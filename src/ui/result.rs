use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::state::AppState;

/// Header above the reviewed quiz questions.
pub fn draw_quiz_result(f: &mut Frame, area: Rect, state: &AppState) {
    let session = &state.session;

    let lines = if session.grading {
        vec![
            Line::from(Span::styled(
                "Grading...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("Checking your answers with the server."),
        ]
    } else {
        let submitted_at = session
            .submitted_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        vec![
            Line::from(Span::styled(
                format!(
                    "✓ Quiz Results: {} / {}",
                    session.score,
                    session.questions.len()
                ),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Submitted at {}   [Enter] New quiz", submitted_at),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    let block = Block::default().borders(Borders::BOTTOM);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

/// Shown once every question on the current page has been answered.
pub fn draw_completion_banner(f: &mut Frame, area: Rect, state: &AppState) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Page complete! Score: {}", state.browser.score),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "[Ctrl+O] Restart   [→] Next page",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::BOTTOM);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}
