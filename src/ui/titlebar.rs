use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::session::Phase;
use crate::state::{AppState, Screen};
use crate::timer::{format_clock, WARNING_SECONDS};

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &AppState) {
    let title = match state.screen {
        Screen::Browse => "Question Bank",
        Screen::Login => "Sign In",
        Screen::Quiz => "Timed Quiz",
        Screen::AdminForm => "Post New Question",
        Screen::BulkImport => "Bulk Upload JSON",
    };

    let quiz_running = state.screen == Screen::Quiz && state.session.phase != Phase::Setup;
    let timer_text = if quiz_running {
        let secs = state.session.remaining_seconds;
        let formatted = format!(" ⏱ {} ", format_clock(secs));
        if secs < WARNING_SECONDS && state.session.phase == Phase::Active {
            Span::styled(
                formatted,
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(formatted, Style::default().fg(Color::Rgb(200, 200, 120)))
        }
    } else {
        Span::raw("")
    };

    let user_text = match &state.auth.user {
        Some(user) if user.is_admin => format!(" {} (admin) ", user.name),
        Some(user) => format!(" {} ", user.name),
        None => " guest ".to_string(),
    };

    let title_text = format!("[ {} ]", title);
    let title_span = Span::styled(
        title_text.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Center the title: pad left so title sits in the middle of the full width
    let available = area.width as usize;
    let title_len = title_text.chars().count();
    let user_len = user_text.chars().count();
    let timer_len = timer_text.content.chars().count();
    let center_pad = (available.saturating_sub(title_len) / 2).saturating_sub(user_len);
    // Right padding fills the gap between centered title and right-aligned timer
    let right_pad = available.saturating_sub(user_len + center_pad + title_len + timer_len);

    let line = Line::from(vec![
        Span::styled(user_text, Style::default().fg(Color::Cyan)),
        Span::raw(" ".repeat(center_pad)),
        title_span,
        Span::raw(" ".repeat(right_pad)),
        timer_text,
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
