//! UI module for rendering the TUI

mod components;
mod forms;
mod home;
mod layout;
mod onboarding;
mod organization;
mod sign_in;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let down_alert = app.session.alerts.down_alert();

    let (banner_area, main_area, status_area) = layout::create_layout(area, down_alert.is_some());

    if let Some(alert) = down_alert {
        layout::draw_banner(frame, banner_area, alert);
    }

    // Draw main content based on current view
    match &app.state.current_view {
        View::Home => home::draw(frame, main_area, app),
        View::Onboarding => onboarding::draw(frame, main_area, app),
        View::Organization(slug) => organization::draw(frame, main_area, app, slug),
        View::SignIn { redirect } => sign_in::draw(frame, main_area, redirect.as_deref()),
    }

    // Modal form on top of the view
    if let Some(dialog) = &app.dialog {
        components::render_form_dialog(frame, dialog.title(), &dialog.form);
    }

    layout::draw_status_bar(frame, status_area, app);
}
