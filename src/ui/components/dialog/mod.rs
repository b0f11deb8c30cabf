//! Dialog components for TUI

mod base;
mod form_dialog;

pub use form_dialog::render_form_dialog;
