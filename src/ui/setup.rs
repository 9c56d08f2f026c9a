use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::session::{QuestionCount, SECONDS_PER_QUESTION};
use crate::state::AppState;

pub fn draw_setup(f: &mut Frame, area: Rect, state: &AppState) {
    let session = &state.session;

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Quiz Setup",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Select chapters:"),
        Line::from(""),
    ];

    if session.available_chapters.is_empty() {
        lines.push(Line::from(Span::styled(
            "    Loading chapters...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, chapter) in session.available_chapters.iter().enumerate() {
        let checked = session.config.chapters.contains(chapter);
        let is_cursor = i == state.setup_cursor;
        let style = match (is_cursor, checked) {
            (true, _) => Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default(),
        };
        lines.push(Line::from(vec![
            Span::styled(if is_cursor { "  ▸ " } else { "    " }, style),
            Span::styled(if checked { "[x] " } else { "[ ] " }, style),
            Span::styled(chapter.clone(), style),
        ]));
    }

    lines.push(Line::from(""));

    // Count picker: ◂ 10  [15]  20  30 ▸
    let mut count_spans = vec![Span::raw("  Questions:  ◂ ")];
    for count in QuestionCount::ALL {
        if count == session.config.count {
            count_spans.push(Span::styled(
                format!("[{}]", count.get()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            count_spans.push(Span::raw(format!(" {} ", count.get())));
        }
        count_spans.push(Span::raw(" "));
    }
    count_spans.push(Span::raw("▸"));
    lines.push(Line::from(count_spans));

    let minutes = session.config.count.get() as i64 * SECONDS_PER_QUESTION / 60;
    lines.push(Line::from(Span::styled(
        format!("  Time limit: {} minutes", minutes),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if let Some(error) = &session.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    let start = if session.loading {
        Span::styled("  Loading quiz...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("  [Enter] Start Quiz", Style::default().fg(Color::Green))
    };
    lines.push(Line::from(start));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, area);
}
