//! Form rendering module
//!
//! Renders any [`crate::state::forms::DraftForm`] from its schema: one
//! bordered box per field, the field's first error under it, then the
//! submit and cancel buttons.

mod field_renderer;

pub use field_renderer::{draw_form, form_height};
