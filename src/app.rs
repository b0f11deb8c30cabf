//! Application state and core logic

use crate::api::{ApiClientTrait, HttpApiClient};
use crate::config::AppConfig;
use crate::i18n::MessageCatalog;
use crate::platform::{self, SHORTCUT_MODIFIER};
use crate::session::{organization_members_path, DraftStore, Navigation, Session, HOME_PATH};
use crate::state::forms::schemas::{self, CREATE_ORGANIZATION, INVITE_USERS};
use crate::state::forms::{DraftForm, Form, InviteScope, Mutation, SuccessEffects};
use crate::state::onboarding::Outcome;
use crate::state::{AppState, OnboardingFlow, Organization, Page, PaginationQuery, View};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;

/// Modal forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    CreateOrganization,
    /// Invite into an organization (by id), or system-wide
    InviteUsers { organization: Option<String> },
}

#[derive(Debug)]
pub struct Dialog {
    pub kind: DialogKind,
    pub form: DraftForm,
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::CreateOrganization => "Create organization",
            DialogKind::InviteUsers { .. } => "Invite users",
        }
    }
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// API client
    pub client: Arc<dyn ApiClientTrait>,
    /// Drafts, banner, toasts and navigation for this run
    pub session: Session,
    pub config: AppConfig,
    /// Open modal form, if any
    pub dialog: Option<Dialog>,
    /// Onboarding wizard, kept while unfinished
    pub onboarding: Option<OnboardingFlow>,
    create_organization: Mutation,
    invite_users: Mutation,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance talking to the configured API
    pub async fn new(config: AppConfig) -> Result<Self> {
        let catalog = MessageCatalog::for_locale(config.language());

        let client = Arc::new(HttpApiClient::new(config.api_url()));
        let session = Session::start(catalog, HOME_PATH);
        let mut app = Self::with_client(client, session, config);
        app.check_identity().await;
        Ok(app)
    }

    pub fn with_client(client: Arc<dyn ApiClientTrait>, session: Session, config: AppConfig) -> Self {
        Self {
            state: AppState::default(),
            client,
            session,
            config,
            dialog: None,
            onboarding: None,
            create_organization: Mutation::new("create organization"),
            invite_users: Mutation::new("invite users"),
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// End the session on the way out
    pub fn shutdown(&self) {
        self.session.end();
    }

    fn drafts(&self) -> Option<&DraftStore> {
        self.config.drafts_enabled().then_some(&self.session.drafts)
    }

    /// Ask the API who we are. Anonymous is not an error.
    pub async fn check_identity(&mut self) -> bool {
        match self.session.track(self.client.get_me().await) {
            Ok(user) => {
                tracing::info!("Signed in as {}", user.email);
                self.state.user = Some(user);
                true
            }
            Err(_) => {
                self.state.user = None;
                false
            }
        }
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        self.state
            .view_history
            .push(self.state.current_view.clone());
        self.state.current_view = view;
        self.state.reset_selection();
        self.session
            .router
            .set_current_path(self.state.current_view.path());
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        // Skip sign-in screens in history
        while let Some(view) = self.state.view_history.pop() {
            if matches!(view, View::SignIn { .. }) {
                continue;
            }
            self.state.current_view = view;
            self.state.reset_selection();
            self.session
                .router
                .set_current_path(self.state.current_view.path());
            return;
        }
    }

    /// Navigate and load what the view needs
    pub async fn open_view(&mut self, view: View) {
        self.navigate(view.clone());
        match view {
            View::Organization(slug) => self.load_organization(&slug).await,
            View::Onboarding => {
                if self.onboarding.is_none() {
                    let flow = OnboardingFlow::new(self.state.user.clone(), self.drafts());
                    self.onboarding = Some(flow);
                }
            }
            View::Home | View::SignIn { .. } => {}
        }
    }

    /// Follow a navigation requested through the session router
    pub async fn apply_pending_navigation(&mut self) {
        if let Some(navigation) = self.session.router.take_pending() {
            let view = View::from_path(&navigation.to, navigation.redirect);
            if view != self.state.current_view {
                self.open_view(view).await;
            }
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.dialog.is_some() {
            self.handle_dialog_key(key).await?;
        } else {
            match self.state.current_view {
                View::Home => self.handle_home_key(key).await,
                View::Onboarding => self.handle_onboarding_key(key).await?,
                View::Organization(_) => self.handle_organization_key(key).await,
                View::SignIn { .. } => self.handle_sign_in_key(key).await,
            }
        }
        self.apply_pending_navigation().await;
        Ok(())
    }

    fn open_dialog(&mut self, kind: DialogKind) {
        let form = match &kind {
            DialogKind::CreateOrganization => {
                DraftForm::new(CREATE_ORGANIZATION, schemas::create_organization())
            }
            DialogKind::InviteUsers { organization } => {
                let scope = if organization.is_some() {
                    InviteScope::Organization
                } else {
                    InviteScope::System
                };
                DraftForm::new(INVITE_USERS, schemas::invite_users(scope))
            }
        };
        let form = match self.drafts() {
            Some(drafts) => form.with_drafts(drafts),
            None => form,
        };
        self.dialog = Some(Dialog { kind, form });
    }

    async fn handle_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            _ if platform::is_shortcut(&key, 's') => self.submit_dialog().await,
            // Cancel: discard values and draft
            _ if platform::is_shortcut(&key, 'x') => {
                if let Some(mut dialog) = self.dialog.take() {
                    dialog.form.cancel();
                }
            }
            // Close: the draft stays for next time
            KeyCode::Esc => self.dialog = None,
            _ => {
                if let Some(dialog) = self.dialog.as_mut() {
                    edit_form(&mut dialog.form, key)?;
                }
            }
        }
        Ok(())
    }

    async fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        if !dialog.form.can_submit() {
            return;
        }
        let Ok(values) = dialog.form.submit() else {
            return;
        };

        let mut dismissed = false;
        match dialog.kind.clone() {
            DialogKind::CreateOrganization => {
                let mut created: Option<Organization> = None;
                let result = self
                    .create_organization
                    .invoke(
                        &self.session,
                        self.client.create_organization(&values),
                        SuccessEffects::new()
                            .reset_form(&mut dialog.form, values.clone())
                            .callback(|org: &Organization| created = Some(org.clone()))
                            .dismiss(|| dismissed = true)
                            .toast("success.create_organization"),
                    )
                    .await;
                if let Err(e) = result {
                    tracing::debug!("Create organization did not complete: {e}");
                }
                if dismissed {
                    self.dialog = None;
                }
                if let Some(org) = created {
                    self.session
                        .router
                        .navigate(Navigation::to(organization_members_path(&org.slug)));
                }
            }
            DialogKind::InviteUsers { organization } => {
                let result = self
                    .invite_users
                    .invoke(
                        &self.session,
                        self.client.invite(&values, organization.clone()),
                        SuccessEffects::new()
                            .reset_form(&mut dialog.form, values.clone())
                            .dismiss(|| dismissed = true)
                            .toast("success.user_invited"),
                    )
                    .await;
                if dismissed {
                    self.dialog = None;
                }
                match result {
                    Ok(()) if organization.is_some() => self.load_members().await,
                    Ok(()) => {}
                    Err(e) => tracing::debug!("Invite did not complete: {e}"),
                }
            }
        }
    }

    async fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('o') => self.open_view(View::Onboarding).await,
            KeyCode::Char('n') => self.open_dialog(DialogKind::CreateOrganization),
            KeyCode::Char('i') => self.open_dialog(DialogKind::InviteUsers { organization: None }),
            // Back to the last organization visited
            KeyCode::Char('m') | KeyCode::Enter => {
                if let Some(org) = &self.state.organization {
                    let view = View::Organization(org.slug.clone());
                    self.open_view(view).await;
                }
            }
            _ => {}
        }
    }

    async fn handle_onboarding_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            _ if platform::is_shortcut(&key, 'f') => self.finish_onboarding().await,
            _ if platform::is_shortcut(&key, 'n') => {
                if let Some(flow) = self.onboarding.as_mut() {
                    flow.wizard.next();
                }
            }
            _ if platform::is_shortcut(&key, 'p') => {
                if let Some(flow) = self.onboarding.as_mut() {
                    flow.wizard.prev();
                }
            }
            KeyCode::Esc => self.go_back(),
            _ => {
                if let Some(flow) = self.onboarding.as_mut() {
                    if let Some(form) = flow.current_form_mut() {
                        edit_form(form, key)?;
                    }
                    flow.sync();
                }
            }
        }
        Ok(())
    }

    async fn finish_onboarding(&mut self) {
        let Some(flow) = self.onboarding.as_mut() else {
            return;
        };
        let report = flow.finish(self.client.as_ref(), &self.session).await;
        if let Outcome::Done(user) = &report.profile {
            self.state.user = Some(user.clone());
        }
        if report.failures() == 0 {
            self.onboarding = None;
        }
    }

    async fn handle_organization_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('j') | KeyCode::Down => {
                let max = self.state.members.items.len();
                self.state.move_selection_down(max);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.state.has_next_members_page() {
                    self.state.members_query = self.state.members_query.next_page();
                    self.load_members().await;
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if self.state.members_query.offset > 0 {
                    self.state.members_query = self.state.members_query.prev_page();
                    self.load_members().await;
                }
            }
            KeyCode::Char('s') => {
                self.state.members_query.order = self.state.members_query.order.toggle();
                self.state.members_query.offset = 0;
                self.load_members().await;
            }
            KeyCode::Char('r') => self.load_members().await,
            KeyCode::Char('n') => self.open_dialog(DialogKind::CreateOrganization),
            KeyCode::Char('i') => {
                let organization = self.state.organization.as_ref().map(|o| o.id.clone());
                self.open_dialog(DialogKind::InviteUsers { organization });
            }
            KeyCode::Esc | KeyCode::Backspace => self.go_back(),
            _ => {}
        }
    }

    async fn handle_sign_in_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Enter => {
                let View::SignIn { redirect } = self.state.current_view.clone() else {
                    return;
                };
                if self.check_identity().await {
                    let target = redirect.unwrap_or_else(|| HOME_PATH.to_string());
                    self.session.router.navigate(Navigation::to(target));
                } else {
                    self.session.toasts.error("Still not signed in.");
                }
            }
            KeyCode::Esc => self.open_view(View::Home).await,
            _ => {}
        }
    }

    /// Load an organization and its first page of members
    async fn load_organization(&mut self, slug: &str) {
        self.state.members = Page::default();
        self.state.members_query = PaginationQuery::default();
        match self.session.track(self.client.get_organization(slug).await) {
            Ok(org) => {
                self.state.organization = Some(org);
                self.load_members().await;
            }
            Err(e) => {
                tracing::debug!("Organization {slug} not loaded: {e}");
                self.state.organization = None;
            }
        }
    }

    async fn load_members(&mut self) {
        let Some(id) = self.state.organization.as_ref().map(|o| o.id.clone()) else {
            return;
        };
        let result = self
            .client
            .list_members(&id, &self.state.members_query)
            .await;
        if let Ok(page) = self.session.track(result) {
            self.state.members = page;
            self.state.reset_selection();
        }
    }
}

/// Keyboard editing shared by dialogs and wizard steps
fn edit_form(form: &mut DraftForm, key: KeyEvent) -> Result<()> {
    let ctrl = key.modifiers.contains(SHORTCUT_MODIFIER);
    match key.code {
        KeyCode::Tab => form.next_field(),
        KeyCode::BackTab => form.prev_field(),
        KeyCode::Left => form.cycle_choice(false)?,
        KeyCode::Right => form.cycle_choice(true)?,
        KeyCode::Enter => form.commit_list_input()?,
        KeyCode::Backspace => form.backspace()?,
        KeyCode::Char(c) if !ctrl => form.input_char(c)?,
        _ => {}
    }
    Ok(())
}
