//! Application state module

mod app_state;
pub mod forms;
pub mod onboarding;
mod pagination;

pub use app_state::*;
pub use onboarding::OnboardingFlow;
pub use pagination::*;
