//! Onboarding flow
//!
//! Owns the wizard and one form per step. Step forms report their values
//! through a channel that [`OnboardingFlow::sync`] drains into the wizard,
//! so the team step appears as soon as an organization name is typed.

use super::app_state::{Organization, User};
use super::forms::{
    schemas, DraftForm, FormValues, InviteScope, Mutation, MutationError, SuccessEffects,
    ValuesChangeCallback, Wizard, STEP_ORGANIZATION, STEP_PROFILE, STEP_TEAM,
};
use crate::api::ApiClientTrait;
use crate::session::{organization_members_path, DraftStore, Navigation, Session, HOME_PATH};
use std::collections::HashMap;
use tokio::sync::mpsc;

pub const ORGANIZATION_FORM: &str = "onboarding-organization";
pub const PROFILE_FORM: &str = "onboarding-profile";
pub const TEAM_FORM: &str = "onboarding-team";

type StepChange = (&'static str, Option<FormValues>);

/// Result of one entity's write during finish
#[derive(Debug)]
pub enum Outcome<T> {
    /// Step left empty or absent
    Skipped,
    Done(T),
    Failed(MutationError),
}

impl<T> Outcome<T> {
    fn from_result(result: Result<T, MutationError>) -> Self {
        match result {
            Ok(value) => Outcome::Done(value),
            Err(error) => Outcome::Failed(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}

/// Per-entity outcome of finishing onboarding
#[derive(Debug)]
pub struct OnboardingReport {
    pub organization: Outcome<Organization>,
    pub profile: Outcome<User>,
    pub invitations: Outcome<()>,
}

impl OnboardingReport {
    pub fn failures(&self) -> usize {
        [
            self.organization.is_failed(),
            self.profile.is_failed(),
            self.invitations.is_failed(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

pub struct OnboardingFlow {
    pub wizard: Wizard,
    pub organization_form: DraftForm,
    pub profile_form: DraftForm,
    /// Exists only while the team step is present
    pub team_form: Option<DraftForm>,
    user: Option<User>,
    drafts: Option<DraftStore>,
    changes_tx: mpsc::UnboundedSender<StepChange>,
    changes_rx: mpsc::UnboundedReceiver<StepChange>,
}

fn reporter(tx: &mpsc::UnboundedSender<StepChange>, step: &'static str) -> ValuesChangeCallback {
    let tx = tx.clone();
    Box::new(move |values: Option<&FormValues>| {
        // receiver lives as long as the flow
        let _ = tx.send((step, values.cloned()));
    })
}

fn step_form(
    form_id: &str,
    form: DraftForm,
    drafts: Option<&DraftStore>,
    tx: &mpsc::UnboundedSender<StepChange>,
    step: &'static str,
) -> DraftForm {
    let form = match drafts {
        Some(drafts) => form.with_drafts(drafts),
        None => form,
    };
    tracing::debug!("Onboarding form {form_id} ready");
    form.on_values_change(reporter(tx, step))
}

impl OnboardingFlow {
    /// Build the flow for `user`. With `drafts`, every step form resumes its draft.
    pub fn new(user: Option<User>, drafts: Option<&DraftStore>) -> Self {
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();

        let organization_form = step_form(
            ORGANIZATION_FORM,
            DraftForm::new(ORGANIZATION_FORM, schemas::create_organization()),
            drafts,
            &changes_tx,
            STEP_ORGANIZATION,
        );

        let profile_defaults = user.as_ref().map(profile_values).unwrap_or_default();
        let profile_form = step_form(
            PROFILE_FORM,
            DraftForm::new(PROFILE_FORM, schemas::update_user()).with_defaults(&profile_defaults),
            drafts,
            &changes_tx,
            STEP_PROFILE,
        );

        let mut flow = Self {
            wizard: Wizard::onboarding(),
            organization_form,
            profile_form,
            team_form: None,
            user,
            drafts: drafts.cloned(),
            changes_tx,
            changes_rx,
        };

        // restored drafts count as reported values
        let restored = [
            (STEP_ORGANIZATION, &flow.organization_form),
            (STEP_PROFILE, &flow.profile_form),
        ]
        .map(|(step, form)| (step, form.is_dirty().then(|| form.values().clone())));
        for (step, values) in restored {
            flow.wizard.on_step_form_change(step, values);
        }
        flow.sync_team_form();
        flow
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Apply pending form notifications to the wizard.
    /// Returns true when the step sequence changed.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        while let Ok((step, values)) = self.changes_rx.try_recv() {
            changed |= self.wizard.on_step_form_change(step, values);
        }
        if changed {
            self.sync_team_form();
        }
        changed
    }

    fn sync_team_form(&mut self) {
        match (self.wizard.contains(STEP_TEAM), self.team_form.is_some()) {
            (true, false) => {
                let mut form = step_form(
                    TEAM_FORM,
                    DraftForm::new(TEAM_FORM, schemas::invite_users(InviteScope::Organization)),
                    self.drafts.as_ref(),
                    &self.changes_tx,
                    STEP_TEAM,
                );
                let remembered = self.wizard.values(STEP_TEAM).cloned();
                form.inject_initial_values(remembered.as_ref());
                // a restored draft counts as reported values
                if remembered.is_none() && form.is_dirty() {
                    self.wizard
                        .on_step_form_change(STEP_TEAM, Some(form.values().clone()));
                }
                self.team_form = Some(form);
            }
            (false, true) => self.team_form = None,
            _ => {}
        }
    }

    /// Form of the step under the wizard cursor
    pub fn current_form_mut(&mut self) -> Option<&mut DraftForm> {
        match self.wizard.current()?.id {
            STEP_ORGANIZATION => Some(&mut self.organization_form),
            STEP_PROFILE => Some(&mut self.profile_form),
            STEP_TEAM => self.team_form.as_mut(),
            _ => None,
        }
    }

    pub fn current_form(&self) -> Option<&DraftForm> {
        match self.wizard.current()?.id {
            STEP_ORGANIZATION => Some(&self.organization_form),
            STEP_PROFILE => Some(&self.profile_form),
            STEP_TEAM => self.team_form.as_ref(),
            _ => None,
        }
    }

    /// Submit every present step. Organization, profile and invitations are
    /// written concurrently and independently; one failing does not stop the
    /// others. Navigates to the new organization, or home.
    pub async fn finish(&mut self, client: &dyn ApiClientTrait, session: &Session) -> OnboardingReport {
        self.sync();
        let mut latest: HashMap<_, _> = self.wizard.aggregate().into_iter().collect();
        let organization_values = latest.remove(STEP_ORGANIZATION);
        let profile_values = latest.remove(STEP_PROFILE);
        let team_values = latest.remove(STEP_TEAM);

        let organization_mutation = Mutation::new("onboarding: create organization");
        let profile_mutation = Mutation::new("onboarding: update profile");
        let invite_mutation = Mutation::new("onboarding: invite team");

        let Self {
            organization_form,
            profile_form,
            team_form,
            user,
            ..
        } = &mut *self;

        let organization = async move {
            let Some(values) = organization_values else {
                return Outcome::Skipped;
            };
            if let Err(errors) = organization_form.submit() {
                return Outcome::Failed(MutationError::Api(errors.into()));
            }
            Outcome::from_result(
                organization_mutation
                    .invoke(
                        session,
                        client.create_organization(&values),
                        SuccessEffects::new()
                            .reset_form(organization_form, values.clone())
                            .toast("success.create_organization"),
                    )
                    .await,
            )
        };

        let profile = async move {
            let (Some(values), Some(user)) = (profile_values, user.as_ref()) else {
                return Outcome::Skipped;
            };
            if let Err(errors) = profile_form.submit() {
                return Outcome::Failed(MutationError::Api(errors.into()));
            }
            Outcome::from_result(
                profile_mutation
                    .invoke(
                        session,
                        client.update_user(&user.id, &values),
                        SuccessEffects::new()
                            .reset_form(profile_form, values.clone())
                            .toast("success.profile_updated"),
                    )
                    .await,
            )
        };

        let invitations = async move {
            let (Some(values), Some(form)) = (team_values, team_form.as_mut()) else {
                return Outcome::Skipped;
            };
            if let Err(errors) = form.submit() {
                return Outcome::Failed(MutationError::Api(errors.into()));
            }
            Outcome::from_result(
                invite_mutation
                    .invoke(
                        session,
                        client.invite(&values, None),
                        SuccessEffects::new()
                            .reset_form(form, values.clone())
                            .toast("success.user_invited"),
                    )
                    .await,
            )
        };

        let (organization, profile, invitations) = tokio::join!(organization, profile, invitations);
        let report = OnboardingReport {
            organization,
            profile,
            invitations,
        };

        tracing::info!("Onboarding finished with {} failure(s)", report.failures());
        if report.failures() == 0 {
            session.notify_success("success.onboarding_finished");
        }
        let target = match &report.organization {
            Outcome::Done(org) => organization_members_path(&org.slug),
            _ => HOME_PATH.to_string(),
        };
        session.router.navigate(Navigation::to(target));
        self.sync();
        report
    }
}

/// Current profile as update-user form values
pub fn profile_values(user: &User) -> FormValues {
    let mut values = FormValues::new()
        .with("first_name", user.first_name.clone().unwrap_or_default())
        .with("last_name", user.last_name.clone().unwrap_or_default());
    if let Some(language) = &user.language {
        values.set("language", language.clone());
    }
    values
}
