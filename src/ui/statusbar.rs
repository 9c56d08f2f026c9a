use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::session::Phase;
use crate::state::{AppState, Screen};

pub fn draw_statusbar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::raw(" ")];

    match state.screen {
        Screen::Quiz if state.session.phase != Phase::Setup => {
            let total = state.session.questions.len();
            spans.push(Span::styled(
                format!("◐ {} / {} answered", state.session.answered_count(), total),
                Style::default().fg(Color::LightBlue),
            ));
            if state.session.phase == Phase::Submitted {
                spans.push(Span::raw("   "));
                spans.push(Span::styled(
                    format!("✓ {} correct", state.session.score),
                    Style::default().fg(Color::Green),
                ));
            }
        }
        _ => {
            let browser = &state.browser;
            spans.push(Span::styled(
                format!("✓ Score {}", browser.score),
                Style::default().fg(Color::Green),
            ));
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!(
                    "◐ {} / {} on page",
                    browser.answered_on_page(),
                    browser.questions.len()
                ),
                Style::default().fg(Color::LightBlue),
            ));
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("Page {} of {}", browser.page + 1, browser.total_pages.max(1)),
                Style::default().fg(Color::White),
            ));
        }
    }

    if let Some(msg) = &state.status_message {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)));
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled("[?] help", Style::default().fg(Color::DarkGray)));

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
