//! Session-scoped draft storage for in-progress forms

use crate::state::forms::FormValues;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Drafts keyed by form id. Cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    inner: Arc<Mutex<HashMap<String, FormValues>>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, FormValues>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write or overwrite the draft for `form_id`
    pub fn save(&self, form_id: &str, values: &FormValues) {
        self.lock().insert(form_id.to_string(), values.clone());
    }

    pub fn load(&self, form_id: &str) -> Option<FormValues> {
        self.lock().get(form_id).cloned()
    }

    /// Remove the draft for `form_id`, returning whether one existed
    pub fn clear(&self, form_id: &str) -> bool {
        self.lock().remove(form_id).is_some()
    }

    pub fn contains(&self, form_id: &str) -> bool {
        self.lock().contains_key(form_id)
    }

    /// Drop every draft (session end)
    pub fn clear_all(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_then_load() {
        let store = DraftStore::new();
        let values = FormValues::new().with("name", "Acme");
        store.save("create-organization", &values);
        assert_eq!(store.load("create-organization"), Some(values));
    }

    #[test]
    fn test_save_overwrites() {
        let store = DraftStore::new();
        store.save("x", &FormValues::new().with("name", "A"));
        store.save("x", &FormValues::new().with("name", "B"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("x").unwrap().text("name"), "B");
    }

    #[test]
    fn test_slots_are_independent() {
        let store = DraftStore::new();
        store.save("a", &FormValues::new().with("name", "A"));
        store.save("b", &FormValues::new().with("name", "B"));
        assert!(store.clear("a"));
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
    }

    #[test]
    fn test_clones_share_state() {
        let store = DraftStore::new();
        let other = store.clone();
        other.save("a", &FormValues::new());
        assert!(store.contains("a"));
        store.clear_all();
        assert!(other.is_empty());
    }

    #[test]
    fn test_clear_missing_returns_false() {
        assert!(!DraftStore::new().clear("nothing"));
    }
}
