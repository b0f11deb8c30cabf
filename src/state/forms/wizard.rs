//! Multi-step wizard
//!
//! Steps are declared once in their natural order. Base steps are always
//! present; a gated step is present exactly while its gating step's form
//! reports values (see [`super::DraftForm::on_values_change`]).

use super::field::FormValues;
use std::collections::HashMap;

pub const STEP_ORGANIZATION: &str = "step-1";
pub const STEP_PROFILE: &str = "step-2";
pub const STEP_TEAM: &str = "step-3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub id: &'static str,
    pub label: &'static str,
    pub optional: bool,
}

impl WizardStep {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[derive(Debug, Clone)]
struct Declared {
    step: WizardStep,
    gated_by: Option<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    declared: Vec<Declared>,
    steps: Vec<WizardStep>,
    values: HashMap<&'static str, FormValues>,
    cursor: usize,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a step that is always present
    pub fn step(mut self, step: WizardStep) -> Self {
        self.steps.push(step.clone());
        self.declared.push(Declared {
            step,
            gated_by: None,
        });
        self
    }

    /// Declare a step that appears only while `gated_by` has values
    pub fn gated_step(mut self, step: WizardStep, gated_by: &'static str) -> Self {
        self.declared.push(Declared {
            step,
            gated_by: Some(gated_by),
        });
        self
    }

    /// The onboarding flow: organization and profile, then the team once
    /// an organization is being created
    pub fn onboarding() -> Self {
        Self::new()
            .step(WizardStep::new(STEP_ORGANIZATION, "Create organization").optional())
            .step(WizardStep::new(STEP_PROFILE, "Your profile").optional())
            .gated_step(
                WizardStep::new(STEP_TEAM, "Your team").optional(),
                STEP_ORGANIZATION,
            )
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.position(step_id).is_some()
    }

    fn position(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    /// Latest values reported for a step
    pub fn values(&self, step_id: &str) -> Option<&FormValues> {
        self.values.get(step_id)
    }

    /// Record a step form change and update gated steps.
    /// Returns true when the step sequence changed.
    pub fn on_step_form_change(&mut self, step_id: &str, values: Option<FormValues>) -> bool {
        let Some(id) = self
            .declared
            .iter()
            .map(|d| d.step.id)
            .find(|id| *id == step_id)
        else {
            tracing::warn!("Change reported for undeclared wizard step {step_id}");
            return false;
        };

        let present = values.is_some();
        match values {
            Some(values) => {
                self.values.insert(id, values);
            }
            None => {
                self.values.remove(id);
            }
        }

        let gated: Vec<usize> = self
            .declared
            .iter()
            .enumerate()
            .filter(|(_, d)| d.gated_by == Some(id))
            .map(|(i, _)| i)
            .collect();

        let mut changed = false;
        for index in gated {
            changed |= if present {
                self.insert_declared(index)
            } else {
                self.remove(self.declared[index].step.id)
            };
        }
        changed
    }

    fn insert_declared(&mut self, index: usize) -> bool {
        let step = self.declared[index].step.clone();
        if self.contains(step.id) {
            return false;
        }
        // after the nearest declared predecessor that is present
        let at = self.declared[..index]
            .iter()
            .rev()
            .find_map(|d| self.position(d.step.id))
            .map_or(0, |p| p + 1);
        tracing::debug!("Wizard step {} inserted at {at}", step.id);
        self.steps.insert(at, step);
        if at <= self.cursor && self.steps.len() > 1 {
            self.cursor += 1;
        }
        true
    }

    fn remove(&mut self, step_id: &str) -> bool {
        let Some(at) = self.position(step_id) else {
            return false;
        };
        tracing::debug!("Wizard step {step_id} removed");
        self.steps.remove(at);
        if at < self.cursor {
            self.cursor -= 1;
        }
        self.cursor = self.cursor.min(self.steps.len().saturating_sub(1));
        true
    }

    pub fn current(&self) -> Option<&WizardStep> {
        self.steps.get(self.cursor)
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    /// Advance; returns false on the last step
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Go back; returns false on the first step
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Latest values of the present steps, in step order
    pub fn aggregate(&self) -> Vec<(&'static str, FormValues)> {
        self.steps
            .iter()
            .filter_map(|step| self.values.get(step.id).map(|v| (step.id, v.clone())))
            .collect()
    }
}
