//! Field rendering utilities for forms

use crate::platform::{CANCEL_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::forms::{DraftForm, FieldKind, FieldSpec, Form};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Bordered input box
const FIELD_HEIGHT: u16 = 3;

fn field_height(form: &DraftForm, spec: &FieldSpec) -> u16 {
    FIELD_HEIGHT + u16::from(form.field_error(spec.name).is_some())
}

/// Rows needed to draw `form` with its buttons
pub fn form_height(form: &DraftForm) -> u16 {
    form.schema()
        .fields()
        .iter()
        .map(|spec| field_height(form, spec))
        .sum::<u16>()
        + BUTTON_HEIGHT
}

/// Draw every field of the form followed by its buttons
pub fn draw_form(frame: &mut Frame, area: Rect, form: &DraftForm) {
    let fields = form.schema().fields();
    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|spec| Constraint::Length(field_height(form, spec)))
        .collect();
    constraints.push(Constraint::Length(BUTTON_HEIGHT));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, spec) in fields.iter().enumerate() {
        draw_field(frame, chunks[idx], form, spec, idx == form.active_field());
    }
    draw_buttons(frame, chunks[fields.len()], form);
}

/// Text shown inside a field's box
fn field_text(form: &DraftForm, spec: &FieldSpec, is_active: bool) -> String {
    let value = form.value(spec.name).display_value();
    match spec.kind {
        FieldKind::List if is_active && !form.list_input.is_empty() => {
            if value.is_empty() {
                form.list_input.clone()
            } else {
                format!("{value}, {}", form.list_input)
            }
        }
        FieldKind::Text if is_active && form.active_choices().is_some() => format!("◂ {value} ▸"),
        _ => value,
    }
}

/// Draw one field with its error line
fn draw_field(frame: &mut Frame, area: Rect, form: &DraftForm, spec: &FieldSpec, is_active: bool) {
    let error = form.field_error(spec.name);
    let border_style = match (is_active, error.is_some()) {
        (_, true) => Style::default().fg(Color::Red),
        (true, false) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::DarkGray),
    };
    let text_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let text = field_text(form, spec, is_active);
    let display = if text.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        text
    };
    let cursor = if is_active { "▌" } else { "" };

    let label = if spec.optional {
        format!(" {} ", spec.label)
    } else {
        format!(" {} * ", spec.label)
    };
    let block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(border_style);

    let input_area = Rect {
        height: area.height.min(FIELD_HEIGHT),
        ..area
    };
    let content = Paragraph::new(Line::from(vec![
        Span::styled(display, text_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]))
    .wrap(Wrap { trim: false })
    .block(block);
    frame.render_widget(content, input_area);

    if let Some(message) = error {
        if area.height > FIELD_HEIGHT {
            let error_area = Rect {
                y: area.y + FIELD_HEIGHT,
                height: 1,
                ..area
            };
            let line = Paragraph::new(format!(" {message}")).style(Style::default().fg(Color::Red));
            frame.render_widget(line, error_area);
        }
    }
}

/// Submit, plus Cancel while there is something to discard
fn draw_buttons(frame: &mut Frame, area: Rect, form: &DraftForm) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18),
            Constraint::Length(22),
            Constraint::Min(0),
        ])
        .split(area);

    render_button(
        frame,
        chunks[0],
        &format!("{SUBMIT_SHORTCUT} Save"),
        Color::Green,
        form.can_submit(),
    );
    if form.show_cancel() {
        render_button(
            frame,
            chunks[1],
            &format!("{CANCEL_SHORTCUT} Discard"),
            Color::Yellow,
            true,
        );
    }
}
