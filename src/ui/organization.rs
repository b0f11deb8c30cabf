//! Organization members view

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Draw the members page of the organization `slug`
pub fn draw(frame: &mut Frame, area: Rect, app: &App, slug: &str) {
    let Some(org) = &app.state.organization else {
        let msg = Paragraph::new(format!("Organization {slug} could not be loaded"))
            .style(Style::default().fg(Color::Red))
            .block(
                Block::default()
                    .title(" Organization ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let members = &app.state.members;
    let title = format!(" {} ({} members) ", org.name, members.total);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if members.items.is_empty() {
        let content = Paragraph::new("No members on this page.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, chunks[0]);
    } else {
        let items: Vec<ListItem> = members
            .items
            .iter()
            .enumerate()
            .map(|(idx, member)| {
                let is_selected = idx == app.state.selected_index;
                let prefix = if is_selected { "▸ " } else { "  " };
                let name_style = if is_selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(format!("{:<24}", member.name), name_style),
                    Span::styled(format!("{:<32}", member.email), Style::default().fg(Color::Gray)),
                    Span::styled(member.role.label(), Style::default().fg(Color::Yellow)),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        let mut list_state = ListState::default().with_selected(Some(app.state.selected_index));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);
    }

    let query = &app.state.members_query;
    let pages = members.total.div_ceil(query.limit.max(1)).max(1);
    let footer = Paragraph::new(format!(
        " Page {}/{}  sorted by {} {}",
        query.page_number(),
        pages,
        query.sort.as_key(),
        query.order.symbol()
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[1]);
}
