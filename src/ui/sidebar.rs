use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::model::Question;
use crate::session::Phase;
use crate::state::AppState;

const STATUS_ROWS: usize = 5; // 1 separator + 4 status lines

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowStatus {
    Unanswered,
    /// Picked but not yet judged.
    Picked,
    Correct,
    Wrong,
}

impl RowStatus {
    fn icon(self) -> (&'static str, Color) {
        match self {
            RowStatus::Unanswered => ("·", Color::DarkGray),
            RowStatus::Picked => ("◐", Color::LightBlue),
            RowStatus::Correct => ("✓", Color::Green),
            RowStatus::Wrong => ("✗", Color::Red),
        }
    }
}

pub fn browser_row_status(state: &AppState, q: &Question) -> RowStatus {
    let browser = &state.browser;
    match browser.answers.get(&q.id) {
        Some(record) if record.feedback.correct => RowStatus::Correct,
        Some(_) => RowStatus::Wrong,
        None if browser.pending.contains(&q.id) => RowStatus::Picked,
        None if browser.drafts.get(&q.id).is_some_and(|d| !d.is_empty()) => RowStatus::Picked,
        None => RowStatus::Unanswered,
    }
}

pub fn quiz_row_status(state: &AppState, q: &Question) -> RowStatus {
    let session = &state.session;
    if session.phase == Phase::Submitted {
        if let Some(feedback) = session.feedback.get(&q.id) {
            return if feedback.correct {
                RowStatus::Correct
            } else {
                RowStatus::Wrong
            };
        }
    }
    match session.answers.get(&q.id) {
        Some(sel) if !sel.is_empty() => RowStatus::Picked,
        _ => RowStatus::Unanswered,
    }
}

pub fn draw_browser_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let rows: Vec<(&Question, RowStatus)> = state
        .browser
        .questions
        .iter()
        .map(|q| (q, browser_row_status(state, q)))
        .collect();
    let title = format!(
        " Page {}/{} ",
        state.browser.page + 1,
        state.browser.total_pages.max(1)
    );
    draw_list(f, area, state, &rows, title);
}

pub fn draw_quiz_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let rows: Vec<(&Question, RowStatus)> = state
        .session
        .questions
        .iter()
        .map(|q| (q, quiz_row_status(state, q)))
        .collect();
    let title = format!(" {} Questions ", rows.len());
    draw_list(f, area, state, &rows, title);
}

fn draw_list(
    f: &mut Frame,
    area: Rect,
    state: &AppState,
    rows: &[(&Question, RowStatus)],
    title: String,
) {
    let mut lines: Vec<Line> = Vec::new();

    let inner_height = area.height.saturating_sub(2) as usize; // account for top/bottom border
    let inner_width = area.width.saturating_sub(1) as usize; // -1 for right border
    let question_height = inner_height.saturating_sub(STATUS_ROWS);
    let current = state.current_index();

    // Auto-scroll so the current row stays visible
    let scroll_offset = if current >= state.sidebar_scroll + question_height {
        current.saturating_sub(question_height.saturating_sub(1))
    } else if current < state.sidebar_scroll {
        current
    } else {
        state.sidebar_scroll
    };

    let title_max_len = area.width.saturating_sub(11) as usize; // cursor+space+icon+space+number+dot+space

    for (qi, (q, status)) in rows.iter().enumerate().skip(scroll_offset) {
        if lines.len() >= question_height {
            break;
        }

        let (icon, color) = status.icon();
        let is_current = qi == current;
        let bg = if is_current {
            Color::DarkGray
        } else {
            Color::Reset
        };
        let style = if is_current {
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::White)
                .bg(bg)
        } else {
            Style::default().bg(bg)
        };

        // First line of the question text, truncated to fit
        let first = q.text.lines().next().unwrap_or_default();
        let title_display = if first.chars().count() > title_max_len {
            let cut: String = first.chars().take(title_max_len.saturating_sub(1)).collect();
            format!("{}…", cut)
        } else {
            first.to_string()
        };

        lines.push(Line::from(vec![
            Span::styled(if is_current { " ▸ " } else { "   " }, style),
            Span::styled(format!("{} ", icon), Style::default().fg(color).bg(bg)),
            Span::styled(format!("{:>2}. ", qi + 1), style),
            Span::styled(title_display, style),
        ]));
    }

    // Pad remaining question area with blank lines
    while lines.len() < question_height {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "─".repeat(inner_width),
        Style::default().fg(Color::DarkGray),
    )));

    let count = |s: RowStatus| rows.iter().filter(|(_, st)| *st == s).count();
    let status_items = [
        (RowStatus::Correct, "correct"),
        (RowStatus::Wrong, "wrong"),
        (RowStatus::Picked, "picked"),
        (RowStatus::Unanswered, "unanswered"),
    ];
    for (status, label) in status_items {
        let (icon, color) = status.icon();
        lines.push(Line::from(Span::styled(
            format!("  {} {:>2} {}", icon, count(status), label),
            Style::default().fg(color),
        )));
    }

    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(title)
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, area);

    if rows.len() > question_height {
        let scrollbar_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: question_height as u16,
        };
        let mut scrollbar_state = ScrollbarState::new(rows.len().saturating_sub(1))
            .position(current)
            .viewport_content_length(3);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}
