//! Layout components (banner, status bar)

use crate::app::App;
use crate::platform::{CANCEL_SHORTCUT, FINISH_SHORTCUT, STEP_SHORTCUTS, SUBMIT_SHORTCUT};
use crate::session::{DownAlert, Severity};
use crate::state::View;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into banner, content and status bar.
/// The banner row collapses when there is nothing to show.
pub fn create_layout(area: Rect, with_banner: bool) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(u16::from(with_banner)), // Banner
            Constraint::Min(0),                         // Content
            Constraint::Length(1),                      // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the service-down banner
pub fn draw_banner(frame: &mut Frame, area: Rect, alert: DownAlert) {
    let banner = Paragraph::new(format!(" ⚠ {} ", alert.message())).style(
        Style::default()
            .bg(Color::Red)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(banner, area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Identity
    let identity = match &app.state.user {
        Some(_) => Span::styled(" ● ", Style::default().fg(Color::Green)),
        None => Span::styled(" ○ ", Style::default().fg(Color::Red)),
    };
    spans.push(identity);

    // View-specific hints
    let hints = match &app.dialog {
        Some(dialog) => dialog_hints(dialog.form.show_cancel()),
        None => get_view_hints(&app.state.current_view),
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    // Latest toast
    if let Some(toast) = app.session.toasts.latest(Utc::now(), app.config.toast_ttl()) {
        let color = match toast.severity {
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(toast.message, Style::default().fg(color)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Cancel is only offered once there is something to discard
fn dialog_hints(show_cancel: bool) -> String {
    let mut hints = format!("Tab:next  {SUBMIT_SHORTCUT}:save  Esc:close");
    if show_cancel {
        hints.push_str(&format!("  {CANCEL_SHORTCUT}:discard"));
    }
    hints
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> String {
    match view {
        View::Home => "o:onboarding  n:new organization  i:invite  m:last organization".to_string(),
        View::Onboarding => {
            format!("Tab:next field  {STEP_SHORTCUTS}:step  {FINISH_SHORTCUT}:finish  Esc:back")
        }
        View::Organization(_) => {
            "j/k:nav  h/l:page  s:sort  i:invite  n:new  r:reload  Esc:back".to_string()
        }
        View::SignIn { .. } => "Enter:retry  Esc:home".to_string(),
    }
}
