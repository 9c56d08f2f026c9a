use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::state::{AppState, Dialog};
use crate::ui::layout::centered_rect;
use crate::ui::question::wrap_text;

pub fn draw_dialog(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };

    match dialog {
        Dialog::ConfirmSubmit => draw_confirm_submit(f, area, state),
        Dialog::ConfirmQuitQuiz => draw_confirm(
            f,
            area,
            "Quit the quiz?",
            &["Your answers will be discarded."],
        ),
        Dialog::ConfirmDelete(id) => draw_confirm(
            f,
            area,
            "Delete this question?",
            &[format!("Question {} is removed for everyone.", id).as_str()],
        ),
        Dialog::ConfirmExit => draw_confirm(f, area, "Quit?", &["Unsaved quiz answers are lost."]),
        Dialog::Alert(message) => draw_alert(f, area, message),
        Dialog::Help => draw_help(f, area),
    }
}

fn confirm_footer() -> Line<'static> {
    Line::from(vec![
        Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
        Span::raw("    "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_confirm_submit(f: &mut Frame, area: Rect, state: &AppState) {
    let session = &state.session;
    let unanswered = session.questions.len().saturating_sub(session.answered_count());
    let mut msg_lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Submit your quiz?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if unanswered > 0 {
        msg_lines.push(Line::from(Span::styled(
            format!("   {} questions are not answered.", unanswered),
            Style::default().fg(Color::White),
        )));
        msg_lines.push(Line::from(""));
    }

    msg_lines.push(confirm_footer());
    msg_lines.push(Line::from(""));

    render_box(f, area, msg_lines, 42, None, Color::Yellow);
}

fn draw_confirm(f: &mut Frame, area: Rect, title: &str, body: &[&str]) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for text in body {
        lines.push(Line::from(format!("   {}", text)));
    }
    lines.push(Line::from(""));
    lines.push(confirm_footer());
    lines.push(Line::from(""));

    render_box(f, area, lines, 44, None, Color::Yellow);
}

fn draw_alert(f: &mut Frame, area: Rect, message: &str) {
    let mut lines = vec![Line::from("")];
    for wline in wrap_text(message, 40) {
        lines.push(Line::from(Span::styled(
            format!("   {}", wline),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   [Enter] OK",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    render_box(f, area, lines, 48, None, Color::Cyan);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Key Bindings",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   ↑/↓        Previous/Next question"),
        Line::from("   ←/→        Previous/Next page"),
        Line::from("   1-9        Jump to page"),
        Line::from("   a-z        Pick/toggle option"),
        Line::from("   Enter      Submit multi-select answer"),
        Line::from("   Ctrl+T     Timed quiz"),
        Line::from("   Ctrl+L     Login / logout"),
        Line::from("   Ctrl+R     Sign up"),
        Line::from("   Ctrl+N     Post question (admin)"),
        Line::from("   Ctrl+B     Bulk upload (admin)"),
        Line::from("   Ctrl+D     Delete question (admin)"),
        Line::from("   Ctrl+O     Restart when complete"),
        Line::from("   Ctrl+S     Submit quiz"),
        Line::from("   Ctrl+Q     Quit"),
        Line::from("   ?          This help"),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    render_box(f, area, lines, 46, Some(" Help "), Color::Cyan);
}

fn render_box(
    f: &mut Frame,
    area: Rect,
    lines: Vec<Line>,
    width: u16,
    title: Option<&str>,
    border: Color,
) {
    // +2 for the border rows
    let rect = centered_rect(width, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    if let Some(title) = title {
        block = block.title(title.to_string());
    }
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, rect);
}
