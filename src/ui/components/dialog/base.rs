//! Base dialog frame

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear},
    Frame,
};

/// Centered, bordered overlay
pub struct DialogFrame<'a> {
    pub title: &'a str,
    pub border_color: Color,
    pub width: u16,
    pub height: u16,
}

impl DialogFrame<'_> {
    /// Clear the area behind the dialog and draw its border.
    /// Returns the inner area for content.
    pub fn render(&self, frame: &mut Frame) -> Rect {
        let area = centered(frame.area(), self.width, self.height);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default()
                    .fg(self.border_color)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .style(Style::default().bg(Color::Black));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }
}

/// A `width` x `height` rect centered in `area`, clipped to it
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
