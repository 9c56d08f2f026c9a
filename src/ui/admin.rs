use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::admin::FormField;
use crate::state::AppState;

pub fn draw_question_form(f: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.admin_form;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Post New Question",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let label_width = 16;
    for field in FormField::ORDER {
        let focused = field == state.form_field;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let marker = if focused { " ▸ " } else { "   " };
        let value = form.field(field);

        let mut value_lines = value.lines();
        let first = value_lines.next().unwrap_or_default().to_string();
        let first = if field == FormField::CorrectIndex {
            format!("◂ {} ▸", first)
        } else if focused {
            format!("{}▏", first)
        } else {
            first
        };

        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(
                format!("{:<w$}", field.label(), w = label_width),
                style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(first, style),
        ]));
        for rest in value_lines {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(3 + label_width)),
                Span::styled(rest.to_string(), style),
            ]));
        }
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "  Posting...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  [Ctrl+S] Post Question", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, area);
}

pub fn draw_bulk_import(f: &mut Frame, area: Rect, state: &AppState) {
    let bulk = &state.bulk;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Bulk Upload JSON",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  Paste a JSON array of questions.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    // Keep the tail of long input in view
    let room = area.height.saturating_sub(10) as usize;
    let input_lines: Vec<&str> = bulk.input.lines().collect();
    let skip = input_lines.len().saturating_sub(room);
    for line in input_lines.iter().skip(skip) {
        lines.push(Line::from(Span::styled(
            format!("  {}", line),
            Style::default().fg(Color::White),
        )));
    }
    lines.push(Line::from(Span::styled("  ▏", Style::default().fg(Color::Yellow))));
    lines.push(Line::from(""));

    if !bulk.status.is_empty() {
        let color = if bulk.status.starts_with("Error") {
            Color::Red
        } else {
            Color::Yellow
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", bulk.status),
            Style::default().fg(color),
        )));
    }
    if !bulk.in_flight {
        lines.push(Line::from(vec![
            Span::styled("  [Ctrl+S] Upload", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
