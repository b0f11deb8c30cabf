//! Home view

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const MENU: &[(&str, &str)] = &[
    ("o", "Onboarding"),
    ("n", "Create organization"),
    ("i", "Invite users"),
];

/// Draw the home view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let greeting = match &app.state.user {
        Some(user) => format!("Welcome, {}", user.display_name()),
        None => "Not signed in".to_string(),
    };
    let header = Paragraph::new(Span::styled(
        greeting,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, chunks[0]);

    let mut lines: Vec<Line> = MENU
        .iter()
        .map(|(key, label)| menu_line(key, label))
        .collect();
    if let Some(org) = &app.state.organization {
        lines.push(menu_line("m", &format!("Back to {}", org.name)));
    }

    let menu = Paragraph::new(lines).block(
        Block::default()
            .title(" Actions ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(menu, chunks[1]);
}

fn menu_line<'a>(key: &'a str, label: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(label.to_string()),
    ])
}
