//! Draft-aware form state
//!
//! [`DraftForm`] owns the values of one form instance. On top of plain value
//! editing it mirrors edits into the session's [`DraftStore`], accepts
//! initial values from a parent exactly once, and tells a parent after every
//! change whether the form holds anything (`Some(values)`) or is pristine
//! (`None`).

use super::field::{FieldValue, FormValues};
use super::schema::{Constraint, FieldKind, FieldSpec, FormSchema, ValidationErrors};
use crate::session::DraftStore;
use std::fmt;
use std::sync::Arc;

/// Trait for common form focus operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form {form} has no field named {field}")]
    UnknownField { form: String, field: String },
}

/// Options for a single `set_value`
#[derive(Debug, Clone, Copy, Default)]
pub struct SetValueOptions {
    /// Re-validate the field right away
    pub validate: bool,
}

/// Consumed-once flag
#[derive(Debug, Default, Clone, Copy)]
pub struct OnceGuard {
    consumed: bool,
}

impl OnceGuard {
    /// Returns true the first time only
    pub fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Receives `Some(values)` while the form is dirty, `None` when pristine
pub type ValuesChangeCallback = Box<dyn FnMut(Option<&FormValues>) + Send>;

pub struct DraftForm {
    form_id: String,
    schema: Arc<FormSchema>,
    defaults: FormValues,
    values: FormValues,
    errors: ValidationErrors,
    drafts: Option<DraftStore>,
    init_guard: OnceGuard,
    submit_attempted: bool,
    on_values_change: Option<ValuesChangeCallback>,
    pub active_field_index: usize,
    /// Entry being typed into a list field, not yet part of the values
    pub list_input: String,
}

impl fmt::Debug for DraftForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftForm")
            .field("form_id", &self.form_id)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("draft_enabled", &self.drafts.is_some())
            .field("active_field_index", &self.active_field_index)
            .finish_non_exhaustive()
    }
}

impl DraftForm {
    /// Create a form seeded with the schema defaults, without draft persistence
    pub fn new(form_id: &str, schema: Arc<FormSchema>) -> Self {
        let defaults = schema.defaults();
        Self {
            form_id: form_id.to_string(),
            values: defaults.clone(),
            defaults,
            schema,
            errors: ValidationErrors::default(),
            drafts: None,
            init_guard: OnceGuard::default(),
            submit_attempted: false,
            on_values_change: None,
            active_field_index: 0,
            list_input: String::new(),
        }
    }

    /// Override some defaults, e.g. with the current profile of a user
    pub fn with_defaults(mut self, overrides: &FormValues) -> Self {
        for (name, value) in overrides.iter() {
            if self.schema.field_spec(name).is_some() {
                self.defaults.set(name, value.clone());
            }
        }
        self.values = self.defaults.clone();
        self
    }

    /// Enable draft persistence. An existing draft for this form id seeds the values.
    pub fn with_drafts(mut self, drafts: &DraftStore) -> Self {
        if let Some(draft) = drafts.load(&self.form_id) {
            tracing::debug!("Restoring draft for {}", self.form_id);
            for (name, value) in draft.iter() {
                if self.schema.field_spec(name).is_some() {
                    self.values.set(name, value.clone());
                }
            }
        }
        self.drafts = Some(drafts.clone());
        self
    }

    /// Register the parent's change callback
    pub fn on_values_change(mut self, callback: ValuesChangeCallback) -> Self {
        self.on_values_change = Some(callback);
        self
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &FieldValue {
        self.values.value(name)
    }

    pub fn defaults(&self) -> &FormValues {
        &self.defaults
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.errors.first(name)
    }

    pub fn draft_enabled(&self) -> bool {
        self.drafts.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.schema
            .fields()
            .iter()
            .any(|spec| self.values.value(spec.name) != self.defaults.value(spec.name))
    }

    /// Names of the fields that differ from their defaults
    pub fn dirty_fields(&self) -> Vec<&'static str> {
        self.schema
            .fields()
            .iter()
            .filter(|spec| self.values.value(spec.name) != self.defaults.value(spec.name))
            .map(|spec| spec.name)
            .collect()
    }

    /// Submit is offered only for a dirty form
    pub fn can_submit(&self) -> bool {
        self.is_dirty()
    }

    /// Cancel is offered only for a dirty form
    pub fn show_cancel(&self) -> bool {
        self.is_dirty()
    }

    /// Set one field. After a failed submit the field is re-validated.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let options = SetValueOptions {
            validate: self.submit_attempted,
        };
        self.set_value_with(name, value, options)
    }

    pub fn set_value_with(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
        options: SetValueOptions,
    ) -> Result<(), FormError> {
        if self.schema.field_spec(name).is_none() {
            return Err(FormError::UnknownField {
                form: self.form_id.clone(),
                field: name.to_string(),
            });
        }
        self.values.set(name, value);
        if options.validate {
            let messages = self.schema.validate_field(name, &self.values);
            self.errors.set_field(name, messages);
        }
        self.after_change();
        Ok(())
    }

    /// Apply values handed in by a parent. Runs once per form instance; the
    /// guard is consumed by the first call even when `init` is `None`.
    pub fn inject_initial_values(&mut self, init: Option<&FormValues>) -> bool {
        if !self.init_guard.consume() {
            return false;
        }
        let Some(init) = init else {
            return false;
        };
        let options = SetValueOptions { validate: true };
        for (name, value) in init.iter() {
            if let Err(e) = self.set_value_with(name, value.clone(), options) {
                tracing::warn!("Ignoring initial value: {e}");
            }
        }
        true
    }

    /// Validate everything. On success returns the values to send.
    pub fn submit(&mut self) -> Result<FormValues, ValidationErrors> {
        self.submit_attempted = true;
        match self.schema.validate(&self.values) {
            Ok(()) => {
                self.errors.clear();
                Ok(self.values.clone())
            }
            Err(errors) => {
                tracing::debug!("Form {} failed validation: {errors}", self.form_id);
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Show errors reported for these values by someone else, e.g. the API client
    pub fn show_errors(&mut self, errors: ValidationErrors) {
        self.submit_attempted = true;
        self.errors = errors;
    }

    /// Back to defaults; the draft is removed
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.errors.clear();
        self.submit_attempted = false;
        self.list_input.clear();
        if let Some(drafts) = &self.drafts {
            drafts.clear(&self.form_id);
        }
        self.notify();
    }

    /// Reset after a successful submit of `submitted`. Fields edited since the
    /// submit keep their current value; the rest go back to defaults.
    pub fn reset_keep_dirty_values(&mut self, submitted: &FormValues) {
        for spec in self.schema.fields() {
            if self.values.value(spec.name) == submitted.value(spec.name) {
                self.values.set(spec.name, self.defaults.value(spec.name).clone());
            }
        }
        self.errors.clear();
        self.submit_attempted = false;
        self.after_change();
    }

    /// Cancel button: discard everything
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn after_change(&mut self) {
        self.persist_draft();
        self.notify();
    }

    fn persist_draft(&self) {
        let Some(drafts) = &self.drafts else {
            return;
        };
        if self.is_dirty() {
            drafts.save(&self.form_id, &self.values);
        } else if drafts.clear(&self.form_id) {
            tracing::debug!("Dropped stale draft for {}", self.form_id);
        }
    }

    fn notify(&mut self) {
        let dirty = self.is_dirty();
        if let Some(callback) = self.on_values_change.as_mut() {
            callback(if dirty { Some(&self.values) } else { None });
        }
    }

    // Keyboard editing of the active field

    pub fn active_spec(&self) -> Option<&FieldSpec> {
        self.schema.fields().get(self.active_field_index)
    }

    fn active_name(&self) -> Option<&'static str> {
        self.active_spec().map(|spec| spec.name)
    }

    /// Choice keys of the active field, if it is a choice field
    pub fn active_choices(&self) -> Option<&'static [&'static str]> {
        choices(self.active_spec()?)
    }

    /// Type a character into the active field
    pub fn input_char(&mut self, c: char) -> Result<(), FormError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        let (name, kind, is_choice) = (spec.name, spec.kind, choices(spec).is_some());
        match kind {
            FieldKind::List if c == ',' || c == ' ' => self.commit_list_input(),
            FieldKind::List => {
                self.list_input.push(c);
                Ok(())
            }
            FieldKind::Text if is_choice => Ok(()),
            FieldKind::Text => {
                let mut text = self.values.text(name).to_string();
                text.push(c);
                self.set_value(name, text)
            }
        }
    }

    /// Remove the last character, or the last list item when nothing is being typed
    pub fn backspace(&mut self) -> Result<(), FormError> {
        let Some(spec) = self.active_spec() else {
            return Ok(());
        };
        let (name, kind, is_choice) = (spec.name, spec.kind, choices(spec).is_some());
        match kind {
            FieldKind::List => {
                if self.list_input.pop().is_some() {
                    return Ok(());
                }
                let mut items = self.values.list(name).to_vec();
                if items.pop().is_some() {
                    self.set_value(name, items)
                } else {
                    Ok(())
                }
            }
            FieldKind::Text if is_choice => Ok(()),
            FieldKind::Text => {
                let mut text = self.values.text(name).to_string();
                if text.pop().is_some() {
                    self.set_value(name, text)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Move the typed entry of the active list field into its values
    pub fn commit_list_input(&mut self) -> Result<(), FormError> {
        let Some(name) = self.active_name() else {
            return Ok(());
        };
        let entry = self.list_input.trim().to_string();
        self.list_input.clear();
        if entry.is_empty() {
            return Ok(());
        }
        let mut items = self.values.list(name).to_vec();
        if items.contains(&entry) {
            return Ok(());
        }
        items.push(entry);
        self.set_value(name, items)
    }

    /// Step the active choice field forwards or backwards
    pub fn cycle_choice(&mut self, forward: bool) -> Result<(), FormError> {
        let (Some(name), Some(keys)) = (self.active_name(), self.active_choices()) else {
            return Ok(());
        };
        if keys.is_empty() {
            return Ok(());
        }
        let current = keys.iter().position(|k| *k == self.values.text(name));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % keys.len(),
            (Some(0), false) => keys.len() - 1,
            (Some(i), false) => i - 1,
        };
        self.set_value(name, keys[next])
    }
}

fn choices(spec: &FieldSpec) -> Option<&'static [&'static str]> {
    spec.constraints.iter().find_map(|c| match c {
        Constraint::OneOf(keys) => Some(*keys),
        _ => None,
    })
}

impl Form for DraftForm {
    fn field_count(&self) -> usize {
        self.schema.fields().len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count().saturating_sub(1));
        self.list_input.clear();
    }
}
