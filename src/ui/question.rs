use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::card::{CardView, OptionView};
use crate::state::AppState;
use crate::ui::markdown::{code_to_lines, markdown_to_lines};

pub fn draw_empty(f: &mut Frame, area: Rect, state: &AppState) {
    let text = if state.browser.loading {
        "Loading questions..."
    } else {
        "No questions found"
    };
    let p = Paragraph::new(format!("  {}", text))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

/// Lines for a card at the given width. Kept separate from drawing so the
/// layout can be checked without a terminal.
pub fn card_lines(card: &CardView, width: u16) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    let mut header = vec![Span::styled(
        format!("  ## Question {}", card.id),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if card.multi {
        header.push(Span::styled(
            "  (select all that apply)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(header));
    lines.push(Line::from(""));

    let body_wrap_width = (width as usize).saturating_sub(4); // 2 indent left + 2 margin right
    for line in markdown_to_lines(&card.text) {
        for wline in wrap_styled_line(line, body_wrap_width) {
            lines.push(indent(wline));
        }
    }

    if let Some(code) = &card.code {
        lines.push(Line::from(""));
        lines.extend(code_to_lines(code));
    }

    lines.push(Line::from(""));
    for option in &card.options {
        push_option(&mut lines, option, card, width);
    }

    if card.shows_submit {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                " Submit Answer ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enter", Style::default().fg(Color::DarkGray)),
        ]));
    }

    if let Some(banner) = &card.banner {
        lines.push(Line::from(""));
        let (text, style) = if banner.correct {
            ("  ✓ Correct!", Style::default().fg(Color::Green))
        } else {
            ("  ✗ Incorrect", Style::default().fg(Color::Red))
        };
        lines.push(Line::from(Span::styled(text, style.add_modifier(Modifier::BOLD))));
        if let Some(explanation) = &banner.explanation {
            for wline in wrap_text(explanation, body_wrap_width) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", wline),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }

    lines
}

fn push_option(lines: &mut Vec<Line<'static>>, option: &OptionView, card: &CardView, width: u16) {
    let marker = match (card.multi, option.selected) {
        (true, true) => "[x]",
        (true, false) => "[ ]",
        (false, true) => "(●)",
        (false, false) => "( )",
    };

    let style = if option.correct {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if option.wrong_pick {
        Style::default().fg(Color::Red)
    } else if option.selected {
        Style::default().fg(Color::Cyan)
    } else if !card.selectable {
        Style::default().fg(Color::Gray)
    } else {
        Style::default()
    };

    let suffix = match option.percent {
        Some(p) => format!(" {}%", p),
        None => String::new(),
    };

    // Prefix: "  (●) a. " = 9 chars
    let prefix = format!("  {} {}. ", marker, option.label);
    let prefix_len = prefix.chars().count();
    let text_width = (width as usize).saturating_sub(prefix_len + suffix.len());
    let wrapped = wrap_text(&option.text, text_width);
    let last = wrapped.len() - 1;
    for (li, wline) in wrapped.into_iter().enumerate() {
        let mut spans = if li == 0 {
            vec![Span::styled(prefix.clone(), style), Span::styled(wline, style)]
        } else {
            vec![Span::raw(" ".repeat(prefix_len)), Span::styled(wline, style)]
        };
        if li == last && !suffix.is_empty() {
            spans.push(Span::styled(suffix.clone(), Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(explanation) = &option.explanation {
        let text_width = (width as usize).saturating_sub(prefix_len + 2);
        for wline in wrap_text(explanation, text_width) {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(prefix_len)),
                Span::styled(format!("↳ {}", wline), Style::default().fg(Color::DarkGray)),
            ]));
        }
    }
}

pub fn draw_card(f: &mut Frame, area: Rect, card: &CardView, scroll: usize) {
    let lines = card_lines(card, area.width);

    // Apply scroll with clamping
    let total_content_lines = lines.len();
    let visible_height = area.height as usize;
    let scroll = scroll.min(total_content_lines.saturating_sub(visible_height));
    let display_lines: Vec<Line> = lines.into_iter().skip(scroll).collect();

    let widget = Paragraph::new(display_lines);
    f.render_widget(widget, area);

    if total_content_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(total_content_lines)
            .position(scroll)
            .viewport_content_length(visible_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn indent(line: Line<'static>) -> Line<'static> {
    Line::from(
        std::iter::once(Span::raw("  "))
            .chain(line.spans)
            .collect::<Vec<_>>(),
    )
}

fn wrap_styled_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line];
    }

    let total_width: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
    if total_width <= width {
        return vec![line];
    }

    // Flatten into (char, style) pairs
    let mut chars: Vec<(char, Style)> = Vec::new();
    for span in &line.spans {
        for c in span.content.chars() {
            chars.push((c, span.style));
        }
    }

    let mut result: Vec<Line<'static>> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if chars.len() - pos <= width {
            result.push(styled_chars_to_line(&chars[pos..]));
            break;
        }

        let chunk_end = pos + width;
        let break_at = if chars[chunk_end].0 == ' ' {
            chunk_end
        } else if let Some(sp) = chars[pos..chunk_end].iter().rposition(|(c, _)| *c == ' ') {
            if sp > 0 { pos + sp } else { chunk_end }
        } else {
            chunk_end
        };

        result.push(styled_chars_to_line(&chars[pos..break_at]));
        pos = break_at;
        if pos < chars.len() && chars[pos].0 == ' ' {
            pos += 1;
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }

    result
}

/// Rebuild a Line from (char, style) pairs, grouping consecutive same-style chars into spans.
fn styled_chars_to_line(chars: &[(char, Style)]) -> Line<'static> {
    let Some(&(_, first_style)) = chars.first() else {
        return Line::from("");
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current_text = String::new();
    let mut current_style = first_style;

    for &(c, style) in chars {
        if style != current_style && !current_text.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current_text), current_style));
        }
        current_style = style;
        current_text.push(c);
    }
    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, current_style));
    }

    Line::from(spans)
}

pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}
