use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::auth::AuthMode;
use crate::state::{AppState, LoginFocus};
use crate::ui::layout::centered_rect;

/// Push a boxed single-line input with a label above it.
pub(crate) fn push_input_box(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    focused: bool,
    box_width: usize,
) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "▏" } else { "" };

    // Show the tail when the value is wider than the box
    let visible: String = {
        let room = box_width.saturating_sub(1);
        let skip = value.chars().count().saturating_sub(room);
        value.chars().skip(skip).collect()
    };
    let padded = format!("{:<width$}", format!("{}{}", visible, cursor), width = box_width);

    lines.push(Line::from(Span::styled(format!("  {}", label), style)));
    lines.push(Line::from(vec![
        Span::raw("  ┌"),
        Span::raw("─".repeat(box_width)),
        Span::raw("┐"),
    ]));
    lines.push(Line::from(vec![
        Span::raw("  │"),
        Span::styled(padded, style),
        Span::raw("│"),
    ]));
    lines.push(Line::from(vec![
        Span::raw("  └"),
        Span::raw("─".repeat(box_width)),
        Span::raw("┘"),
    ]));
}

pub fn draw_login(f: &mut Frame, area: Rect, state: &AppState) {
    let rect = centered_rect(50, 20, area);
    let box_width = rect.width.saturating_sub(8) as usize;

    let (title, action, switch) = match state.auth_mode {
        AuthMode::Login => ("Login", "[Enter] Sign In", "No account? [Ctrl+R] Sign Up"),
        AuthMode::Register => ("Create Account", "[Enter] Sign Up", "Have an account? [Ctrl+R] Login"),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    push_input_box(
        &mut lines,
        "Username",
        &state.login_username,
        state.login_focus == LoginFocus::Username,
        box_width,
    );
    lines.push(Line::from(""));
    let masked = "•".repeat(state.login_password.chars().count());
    push_input_box(
        &mut lines,
        "Password",
        &masked,
        state.login_focus == LoginFocus::Password,
        box_width,
    );
    lines.push(Line::from(""));

    if let Some(error) = &state.auth.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        )));
    } else if state.auth.loading {
        lines.push(Line::from(Span::styled(
            "  Please wait...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("  {}", action), Style::default().fg(Color::Green)),
        Span::raw("    "),
        Span::styled("[Esc] Back", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {}", switch),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);
    f.render_widget(widget, rect);
}
