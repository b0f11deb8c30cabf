//! Form field value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type-safe field values
///
/// Serializes untagged so a value set reads like the request body it becomes:
/// `Empty` is `null`, `Text` a string, `List` an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Get the text value (returns empty string for other variants)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Empty | FieldValue::List(_) => "",
        }
    }

    /// Get the list items (returns an empty slice for other variants)
    pub fn as_list(&self) -> &[String] {
        match self {
            FieldValue::List(items) => items,
            FieldValue::Empty | FieldValue::Text(_) => &[],
        }
    }

    /// True when the value carries nothing a user typed
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Empty)
    }
}

/// Current values of a form, keyed by field name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for call sites that assemble values inline
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Field value, treating a missing key as `Empty`
    pub fn value(&self, name: &str) -> &FieldValue {
        static EMPTY: FieldValue = FieldValue::Empty;
        self.0.get(name).unwrap_or(&EMPTY)
    }

    pub fn text(&self, name: &str) -> &str {
        self.value(name).as_text()
    }

    /// Text value, `None` when blank
    pub fn optional_text(&self, name: &str) -> Option<String> {
        let text = self.text(name);
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    pub fn list(&self, name: &str) -> &[String] {
        self.value(name).as_list()
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, FieldValue)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (&'a str, FieldValue)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}
