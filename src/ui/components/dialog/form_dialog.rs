//! Modal form dialog

use super::base::DialogFrame;
use crate::state::forms::DraftForm;
use crate::ui::forms::{draw_form, form_height};
use ratatui::{style::Color, Frame};

const DIALOG_WIDTH: u16 = 64;

/// Render a form as a centered dialog overlay
pub fn render_form_dialog(frame: &mut Frame, title: &str, form: &DraftForm) {
    let inner = DialogFrame {
        title,
        border_color: Color::Cyan,
        width: DIALOG_WIDTH,
        height: form_height(form) + 2,
    }
    .render(frame);

    draw_form(frame, inner, form);
}
