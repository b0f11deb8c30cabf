//! Onboarding wizard view

use super::forms::draw_form;
use crate::app::App;
use crate::state::OnboardingFlow;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the onboarding view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(flow) = &app.onboarding else {
        let done = Paragraph::new("Onboarding complete.")
            .style(Style::default().fg(Color::Green))
            .block(Block::default().title(" Onboarding ").borders(Borders::ALL));
        frame.render_widget(done, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_steps(frame, chunks[0], flow);

    let title = flow
        .wizard
        .current()
        .map(|step| {
            if step.optional {
                format!(" {} (optional) ", step.label)
            } else {
                format!(" {} ", step.label)
            }
        })
        .unwrap_or_default();
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    if let Some(form) = flow.current_form() {
        draw_form(frame, inner, form);
    }
}

/// Step tabs: done steps dimmed, current step highlighted
fn draw_steps(frame: &mut Frame, area: Rect, flow: &OnboardingFlow) {
    let current = flow.wizard.current_index();
    let mut spans = Vec::new();
    for (idx, step) in flow.wizard.steps().iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if idx == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{}. {}", idx + 1, step.label), style));
    }

    let steps = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(steps, area);
}
