//! Schemas of the application's forms
//!
//! Each constructor returns a shared, immutable schema. The same `Arc` is
//! handed to the form controller and to the API client.

use super::field::FormValues;
use super::schema::{FieldSpec, FormSchema};
use crate::state::Role;
use std::sync::{Arc, OnceLock};

pub const CREATE_ORGANIZATION: &str = "create-organization";
pub const INVITE_USERS: &str = "invite-users";
pub const UPDATE_USER: &str = "update-user";

pub const LANGUAGES: &[&str] = &["en", "nl"];

/// Reusable password field: 8 to 100 characters
pub fn password_field(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::text(name, label).length(Some(8), Some(100))
}

/// Opaque entity id
pub fn id_field(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::text(name, label).length(Some(1), None)
}

/// URL slug, e.g. `john-doe`
pub fn slug_field(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::text(name, label).length(Some(1), None)
}

pub fn create_organization() -> Arc<FormSchema> {
    static SCHEMA: OnceLock<Arc<FormSchema>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Arc::new(
                FormSchema::new(CREATE_ORGANIZATION)
                    .field(FieldSpec::text("name", "Name").length(Some(2), Some(255))),
            )
        })
        .clone()
}

/// Who is being invited decides which roles are on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InviteScope {
    #[default]
    System,
    Organization,
}

impl InviteScope {
    pub fn roles(self) -> &'static [Role] {
        match self {
            InviteScope::System => &[Role::Admin, Role::User],
            InviteScope::Organization => &[Role::Admin, Role::Member],
        }
    }

    /// The least privileged role, preselected in the form
    pub fn default_role(self) -> Role {
        let roles = self.roles();
        roles[roles.len() - 1]
    }
}

pub fn invite_users(scope: InviteScope) -> Arc<FormSchema> {
    static SYSTEM: OnceLock<Arc<FormSchema>> = OnceLock::new();
    static ORGANIZATION: OnceLock<Arc<FormSchema>> = OnceLock::new();
    let cell = match scope {
        InviteScope::System => &SYSTEM,
        InviteScope::Organization => &ORGANIZATION,
    };
    cell.get_or_init(|| {
        Arc::new(
            FormSchema::new(INVITE_USERS)
                .field(FieldSpec::list("emails", "Emails").email().items(Some(1), None))
                .field(
                    FieldSpec::text("role", "Role")
                        .optional()
                        .one_of(Role::KEYS)
                        .default_value(scope.default_role().as_key()),
                ),
        )
    })
    .clone()
}

pub fn update_user() -> Arc<FormSchema> {
    static SCHEMA: OnceLock<Arc<FormSchema>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Arc::new(
                FormSchema::new(UPDATE_USER)
                    .field(
                        FieldSpec::text("first_name", "First name")
                            .optional()
                            .length(None, Some(255)),
                    )
                    .field(
                        FieldSpec::text("last_name", "Last name")
                            .optional()
                            .length(None, Some(255)),
                    )
                    .field(
                        FieldSpec::text("language", "Language")
                            .one_of(LANGUAGES)
                            .default_value("en"),
                    )
                    .field(password_field("new_password", "New password").optional())
                    .refine(last_name_with_first_name),
            )
        })
        .clone()
}

fn last_name_with_first_name(values: &FormValues) -> Option<(&'static str, String)> {
    let has_first = !values.text("first_name").trim().is_empty();
    let has_last = !values.text("last_name").trim().is_empty();
    (has_first && !has_last).then(|| ("last_name", "Last name is required with a first name".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::FieldValue;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    mod create_organization_schema {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_name_is_blank() {
            assert_eq!(create_organization().defaults().text("name"), "");
        }

        #[test]
        fn test_name_bounds() {
            let schema = create_organization();
            assert!(schema.validate(&FormValues::new().with("name", "Acme")).is_ok());
            let errors = schema
                .validate(&FormValues::new().with("name", "A"))
                .unwrap_err();
            assert!(errors.contains("name"));
        }

        #[test]
        fn test_schema_is_shared() {
            assert!(Arc::ptr_eq(&create_organization(), &create_organization()));
        }
    }

    mod invite_schema {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_role_depends_on_scope() {
            assert_eq!(
                invite_users(InviteScope::System).defaults().text("role"),
                "USER"
            );
            assert_eq!(
                invite_users(InviteScope::Organization).defaults().text("role"),
                "MEMBER"
            );
        }

        #[test]
        fn test_requires_one_email() {
            let schema = invite_users(InviteScope::System);
            let errors = schema.validate(&schema.defaults()).unwrap_err();
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["emails"]);
        }

        #[test]
        fn test_rejects_bad_email_and_role() {
            let schema = invite_users(InviteScope::Organization);
            let values = FormValues::new()
                .with("emails", vec!["ok@example.com", "nope"])
                .with("role", "OWNER");
            let errors = schema.validate(&values).unwrap_err();
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["emails", "role"]);
        }

        #[test]
        fn test_role_may_be_left_out() {
            let schema = invite_users(InviteScope::System);
            let values = FormValues::new()
                .with("emails", vec!["a@example.com"])
                .with("role", FieldValue::Empty);
            assert!(schema.validate(&values).is_ok());
        }
    }

    mod update_user_schema {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_defaults_validate() {
            let schema = update_user();
            assert!(schema.validate(&schema.defaults()).is_ok());
        }

        #[test]
        fn test_password_bounds() {
            let schema = update_user();
            let short = schema.defaults().with("new_password", "1234567");
            assert!(schema.validate(&short).unwrap_err().contains("new_password"));
            let ok = schema.defaults().with("new_password", "12345678");
            assert!(schema.validate(&ok).is_ok());
            let long = schema.defaults().with("new_password", "x".repeat(101));
            assert!(schema.validate(&long).unwrap_err().contains("new_password"));
        }

        #[test]
        fn test_first_name_needs_last_name() {
            let schema = update_user();
            let values = schema.defaults().with("first_name", "Jane");
            let errors = schema.validate(&values).unwrap_err();
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["last_name"]);
            let values = values.with("last_name", "Doe");
            assert!(schema.validate(&values).is_ok());
        }
    }

    proptest! {
        #[test]
        fn organization_name_length_decides_validity(name in "[a-zA-Z ]{0,300}") {
            let count = name.chars().count();
            let result = create_organization().validate(&FormValues::new().with("name", name));
            prop_assert_eq!(result.is_ok(), (2..=255).contains(&count));
        }
    }
}
