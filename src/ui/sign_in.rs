//! Sign-in required view

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the sign-in prompt
pub fn draw(frame: &mut Frame, area: Rect, redirect: Option<&str>) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Your session has expired or you are not signed in.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Sign in with your browser, then press Enter to continue."),
    ];
    if let Some(redirect) = redirect {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("You will return to {redirect}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Sign in ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(content, area);
}
