//! Form domain layer
//!
//! Schemas, draft-aware form state, the mutation lifecycle and the wizard
//! that strings step forms together.

mod field;
mod form_state;
mod mutation;
mod schema;
pub mod schemas;
mod wizard;

pub use field::{FieldValue, FormValues};
pub use form_state::{
    DraftForm, Form, FormError, OnceGuard, SetValueOptions, ValuesChangeCallback,
};
pub use mutation::{Mutation, MutationError, MutationState, MutationStatus, SuccessEffects};
pub use schema::{
    Constraint, FieldKind, FieldSpec, FormSchema, NumberBound, Refinement, ValidationErrors,
};
pub use schemas::InviteScope;
pub use wizard::{Wizard, WizardStep, STEP_ORGANIZATION, STEP_PROFILE, STEP_TEAM};
