//! Trait abstraction for the API client to enable mocking in tests

use super::error::ApiError;
use crate::state::forms::FormValues;
use crate::state::{Member, Organization, Page, PaginationQuery, User};
use async_trait::async_trait;

/// Remote operations consumed by the forms and views
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    /// Current-user identity check. Failures are silent.
    async fn get_me(&self) -> Result<User, ApiError>;

    /// Create an organization from create-organization form values
    async fn create_organization(&self, values: &FormValues) -> Result<Organization, ApiError>;

    /// Send invitations from invite-users form values
    async fn invite(
        &self,
        values: &FormValues,
        organization: Option<String>,
    ) -> Result<(), ApiError>;

    /// Update a user from update-user form values
    async fn update_user(&self, user_id: &str, values: &FormValues) -> Result<User, ApiError>;

    /// Get an organization by slug or id
    async fn get_organization(&self, id_or_slug: &str) -> Result<Organization, ApiError>;

    /// List the members of an organization
    async fn list_members(
        &self,
        organization: &str,
        query: &PaginationQuery,
    ) -> Result<Page<Member>, ApiError>;
}
