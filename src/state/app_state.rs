//! Application state definitions

use super::pagination::PaginationQuery;
use serde::{Deserialize, Serialize};

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Onboarding,
    /// Members page of an organization, by slug
    Organization(String),
    /// Sign-in required; returns to `redirect` afterwards
    SignIn { redirect: Option<String> },
}

impl View {
    /// Route path for this view
    pub fn path(&self) -> String {
        match self {
            View::Home => crate::session::HOME_PATH.to_string(),
            View::Onboarding => crate::session::ONBOARDING_PATH.to_string(),
            View::Organization(slug) => crate::session::organization_members_path(slug),
            View::SignIn { .. } => crate::session::SIGN_IN_PATH.to_string(),
        }
    }

    /// Resolve a route path back to a view
    pub fn from_path(path: &str, redirect: Option<String>) -> Self {
        match path {
            crate::session::HOME_PATH => View::Home,
            crate::session::ONBOARDING_PATH => View::Onboarding,
            crate::session::SIGN_IN_PATH => View::SignIn { redirect },
            other => {
                let mut segments = other.trim_matches('/').split('/');
                match (segments.next(), segments.next()) {
                    (Some(slug), Some("members")) if !slug.is_empty() => {
                        View::Organization(slug.to_string())
                    }
                    _ => View::Home,
                }
            }
        }
    }
}

/// Membership role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Member,
    User,
}

impl Role {
    pub const KEYS: &'static [&'static str] = &["ADMIN", "MEMBER", "USER"];

    pub fn as_key(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
            Role::User => "USER",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ADMIN" => Some(Role::Admin),
            "MEMBER" => Some(Role::Member),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Member => "Member",
            Role::User => "User",
        }
    }
}

/// Organization information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

/// User information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Member of an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Identity
    pub user: Option<User>,

    // Organization page
    pub organization: Option<Organization>,
    pub members: Page<Member>,
    pub members_query: PaginationQuery,

    // Selection
    pub selected_index: usize,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// True when another page of members exists after the current one
    pub fn has_next_members_page(&self) -> bool {
        self.members_query.offset + self.members_query.limit < self.members.total
    }
}
