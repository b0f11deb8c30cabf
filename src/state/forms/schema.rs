//! Declarative form schemas and validation
//!
//! A [`FormSchema`] describes every field of a form: its primitive kind,
//! whether it may be left out, its default and its constraints. The same
//! schema validates user input in a form and request bodies in the API
//! client, so a constraint is enforced identically on both sides.

use super::field::{FieldValue, FormValues};
use std::collections::BTreeMap;

/// Primitive kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
}

/// Inclusive or exclusive lower bound for numeric strings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberBound {
    AtLeast(f64),
    GreaterThan(f64),
}

impl NumberBound {
    fn admits(self, n: f64) -> bool {
        match self {
            NumberBound::AtLeast(min) => n >= min,
            NumberBound::GreaterThan(min) => n > min,
        }
    }
}

/// A single validation rule attached to a field
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Character count bounds for text
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Text must be one of the listed keys
    OneOf(&'static [&'static str]),
    /// Text, or every list item, must look like an e-mail address
    Email,
    /// Item count bounds for lists
    Items {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Text must parse as a number within the bound
    Number {
        bound: NumberBound,
        message: &'static str,
    },
}

/// Cross-field rule. Returns the offending field and a message.
pub type Refinement = fn(&FormValues) -> Option<(&'static str, String)>;

/// Configuration of a single field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
    pub default: FieldValue,
    pub constraints: Vec<Constraint>,
    pub is_multiline: bool,
}

impl FieldSpec {
    /// Create a new text field, defaulting to `""`
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            optional: false,
            default: FieldValue::Text(String::new()),
            constraints: Vec::new(),
            is_multiline: false,
        }
    }

    /// Create a new list field, defaulting to `[]`
    pub fn list(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::List,
            optional: false,
            default: FieldValue::List(Vec::new()),
            constraints: Vec::new(),
            is_multiline: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn multiline(mut self) -> Self {
        self.is_multiline = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.constraints.push(Constraint::Length { min, max });
        self
    }

    pub fn one_of(mut self, keys: &'static [&'static str]) -> Self {
        self.constraints.push(Constraint::OneOf(keys));
        self
    }

    pub fn email(mut self) -> Self {
        self.constraints.push(Constraint::Email);
        self
    }

    pub fn items(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.constraints.push(Constraint::Items { min, max });
        self
    }

    pub fn number(mut self, bound: NumberBound, message: &'static str) -> Self {
        self.constraints.push(Constraint::Number { bound, message });
        self
    }

    /// Validate a value against this field, returning every violated message
    pub fn check(&self, value: &FieldValue) -> Vec<String> {
        if matches!(value, FieldValue::Empty) {
            return if self.optional {
                Vec::new()
            } else {
                vec!["Required".to_string()]
            };
        }
        if self.optional && value.is_blank() {
            return Vec::new();
        }

        match (self.kind, value) {
            (FieldKind::Text, FieldValue::Text(text)) => self.check_text(text),
            (FieldKind::List, FieldValue::List(items)) => self.check_list(items),
            (FieldKind::Text, _) => vec!["Expected text".to_string()],
            (FieldKind::List, _) => vec!["Expected a list".to_string()],
        }
    }

    fn check_text(&self, text: &str) -> Vec<String> {
        let mut errors = Vec::new();
        for constraint in &self.constraints {
            match constraint {
                Constraint::Length { min, max } => {
                    let count = text.chars().count();
                    if let Some(min) = min {
                        if count < *min {
                            errors.push(format!("Must contain at least {min} character(s)"));
                        }
                    }
                    if let Some(max) = max {
                        if count > *max {
                            errors.push(format!("Must contain at most {max} character(s)"));
                        }
                    }
                }
                Constraint::OneOf(keys) => {
                    if !keys.contains(&text) {
                        errors.push(format!("Must be one of: {}", keys.join(", ")));
                    }
                }
                Constraint::Email => {
                    if !is_email(text) {
                        errors.push("Invalid email".to_string());
                    }
                }
                Constraint::Number { bound, message } => match parse_number(text) {
                    Some(n) if bound.admits(n) => {}
                    _ => errors.push((*message).to_string()),
                },
                Constraint::Items { .. } => {}
            }
        }
        errors
    }

    fn check_list(&self, items: &[String]) -> Vec<String> {
        let mut errors = Vec::new();
        for constraint in &self.constraints {
            match constraint {
                Constraint::Items { min, max } => {
                    if let Some(min) = min {
                        if items.len() < *min {
                            errors.push(format!("Must contain at least {min} item(s)"));
                        }
                    }
                    if let Some(max) = max {
                        if items.len() > *max {
                            errors.push(format!("Must contain at most {max} item(s)"));
                        }
                    }
                }
                Constraint::Email => {
                    if let Some(bad) = items.iter().find(|item| !is_email(item)) {
                        errors.push(format!("Invalid email: {bad}"));
                    }
                }
                Constraint::OneOf(keys) => {
                    if let Some(bad) = items.iter().find(|item| !keys.contains(&item.as_str())) {
                        errors.push(format!("Unknown value: {bad}"));
                    }
                }
                Constraint::Length { .. } | Constraint::Number { .. } => {}
            }
        }
        errors
    }
}

/// Immutable description of a form
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: &'static str,
    fields: Vec<FieldSpec>,
    refinements: Vec<Refinement>,
}

impl FormSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            refinements: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Default values for every declared field
    pub fn defaults(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name, f.default.clone()))
            .collect()
    }

    /// Validate a full value set. Unknown keys are ignored, missing keys read as `Empty`.
    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for spec in &self.fields {
            for message in spec.check(values.value(spec.name)) {
                errors.insert(spec.name, message);
            }
        }
        for refinement in &self.refinements {
            if let Some((field, message)) = refinement(values) {
                errors.insert(field, message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Messages for a single field, including refinements attributed to it
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Vec<String> {
        let mut messages = self
            .field_spec(name)
            .map(|spec| spec.check(values.value(name)))
            .unwrap_or_default();
        messages.extend(
            self.refinements
                .iter()
                .filter_map(|r| r(values))
                .filter(|(field, _)| *field == name)
                .map(|(_, message)| message),
        );
        messages
    }
}

/// Per-field validation failures
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("invalid {}", field_list(&.0))]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

fn field_list(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors.keys().cloned().collect::<Vec<_>>().join(", ")
}

impl ValidationErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Replace the messages for one field; an empty list clears it
    pub fn set_field(&mut self, field: &str, messages: Vec<String>) {
        if messages.is_empty() {
            self.0.remove(field);
        } else {
            self.0.insert(field.to_string(), messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Loose e-mail shape check: one `@`, non-empty local part, dotted domain
fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !text.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_schema() -> FormSchema {
        FormSchema::new("sample")
            .field(FieldSpec::text("name", "Name").length(Some(2), Some(5)))
            .field(
                FieldSpec::text("role", "Role")
                    .optional()
                    .one_of(&["ADMIN", "MEMBER"]),
            )
            .field(FieldSpec::list("emails", "Emails").email().items(Some(1), Some(2)))
    }

    fn valid_values() -> FormValues {
        FormValues::new()
            .with("name", "Acme")
            .with("role", "ADMIN")
            .with("emails", vec!["a@b.io"])
    }

    mod field_spec {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_required_empty_fails() {
            let spec = FieldSpec::text("name", "Name");
            assert_eq!(spec.check(&FieldValue::Empty), vec!["Required".to_string()]);
        }

        #[test]
        fn test_optional_blank_skips_constraints() {
            let spec = FieldSpec::text("bio", "Bio").optional().length(Some(3), None);
            assert!(spec.check(&FieldValue::Empty).is_empty());
            assert!(spec.check(&FieldValue::from("")).is_empty());
            assert_eq!(spec.check(&FieldValue::from("ab")).len(), 1);
        }

        #[test]
        fn test_kind_mismatch() {
            let spec = FieldSpec::text("name", "Name");
            assert_eq!(
                spec.check(&FieldValue::from(vec!["x"])),
                vec!["Expected text".to_string()]
            );
        }

        #[test]
        fn test_length_counts_chars_not_bytes() {
            let spec = FieldSpec::text("name", "Name").length(None, Some(3));
            assert!(spec.check(&FieldValue::from("äöü")).is_empty());
        }

        #[test]
        fn test_number_bounds() {
            let at_least = FieldSpec::text("offset", "Offset").number(NumberBound::AtLeast(0.0), "ge0");
            assert!(at_least.check(&FieldValue::from("0")).is_empty());
            assert_eq!(at_least.check(&FieldValue::from("-1")), vec!["ge0".to_string()]);
            assert_eq!(at_least.check(&FieldValue::from("abc")), vec!["ge0".to_string()]);

            let greater = FieldSpec::text("limit", "Limit").number(NumberBound::GreaterThan(0.0), "gt0");
            assert!(greater.check(&FieldValue::from("1")).is_empty());
            assert_eq!(greater.check(&FieldValue::from("0")), vec!["gt0".to_string()]);
        }
    }

    mod email {
        use super::*;

        #[test]
        fn test_accepts_plain_address() {
            assert!(is_email("jane@example.com"));
            assert!(is_email("j.doe+tag@mail.example.org"));
        }

        #[test]
        fn test_rejects_malformed() {
            for bad in ["", "jane", "@example.com", "jane@", "jane@example", "ja ne@x.io", "a@b@c.io"] {
                assert!(!is_email(bad), "{bad} should be rejected");
            }
        }
    }

    mod form_schema {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_values_pass() {
            assert!(sample_schema().validate(&valid_values()).is_ok());
        }

        #[test]
        fn test_each_violation_is_attributed_to_its_field() {
            let cases = [
                ("name", FieldValue::from("A")),
                ("name", FieldValue::from("Toolong")),
                ("role", FieldValue::from("OWNER")),
                ("emails", FieldValue::from(Vec::<String>::new())),
                ("emails", FieldValue::from(vec!["a@b.io", "c@d.io", "e@f.io"])),
                ("emails", FieldValue::from(vec!["not-an-email"])),
            ];
            for (field, bad) in cases {
                let mut values = valid_values();
                values.set(field, bad);
                let errors = sample_schema().validate(&values).unwrap_err();
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec![field]);
            }
        }

        #[test]
        fn test_defaults_cover_all_fields() {
            let defaults = sample_schema().defaults();
            assert_eq!(defaults.len(), 3);
            assert_eq!(defaults.text("name"), "");
            assert!(defaults.list("emails").is_empty());
        }

        #[test]
        fn test_refinement_attributed_to_named_field() {
            let schema = sample_schema().refine(|values| {
                (values.text("name") == "Acme" && values.text("role") != "ADMIN")
                    .then(|| ("role", "Acme needs an admin".to_string()))
            });
            let mut values = valid_values();
            values.set("role", "MEMBER");
            let errors = schema.validate(&values).unwrap_err();
            assert_eq!(errors.first("role"), Some("Acme needs an admin"));
            assert_eq!(
                schema.validate_field("role", &values),
                vec!["Acme needs an admin".to_string()]
            );
        }

        #[test]
        fn test_unknown_keys_ignored() {
            let values = valid_values().with("extra", "x");
            assert!(sample_schema().validate(&values).is_ok());
        }
    }

    mod validation_errors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_display_lists_fields() {
            let mut errors = ValidationErrors::default();
            errors.insert("name", "Required");
            errors.insert("emails", "Required");
            assert_eq!(errors.to_string(), "invalid emails, name");
        }

        #[test]
        fn test_set_field_with_empty_clears() {
            let mut errors = ValidationErrors::default();
            errors.insert("name", "Required");
            errors.set_field("name", Vec::new());
            assert!(errors.is_empty());
        }
    }
}
