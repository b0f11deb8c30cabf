//! Global "service down" banner state

use std::sync::{Arc, Mutex, PoisonError};

/// Why the service is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownAlert {
    Maintenance,
    Offline,
}

impl DownAlert {
    pub fn message(self) -> &'static str {
        match self {
            DownAlert::Maintenance => "The service is down for maintenance. Please try again later.",
            DownAlert::Offline => "The service cannot be reached. Check your connection.",
        }
    }
}

/// Banner store with last-write-wins semantics. Cloning shares the same banner.
#[derive(Debug, Clone, Default)]
pub struct AlertStore {
    down: Arc<Mutex<Option<DownAlert>>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down_alert(&self, alert: Option<DownAlert>) {
        let mut down = self.down.lock().unwrap_or_else(PoisonError::into_inner);
        if *down != alert {
            tracing::debug!("Down alert changed: {:?} -> {:?}", *down, alert);
        }
        *down = alert;
    }

    pub fn down_alert(&self) -> Option<DownAlert> {
        *self.down.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_alert() {
        assert!(AlertStore::new().down_alert().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let store = AlertStore::new();
        store.set_down_alert(Some(DownAlert::Maintenance));
        store.set_down_alert(Some(DownAlert::Offline));
        assert_eq!(store.down_alert(), Some(DownAlert::Offline));
        store.set_down_alert(None);
        assert!(store.down_alert().is_none());
    }

    #[test]
    fn test_clones_share_banner() {
        let store = AlertStore::new();
        store.clone().set_down_alert(Some(DownAlert::Maintenance));
        assert_eq!(store.down_alert(), Some(DownAlert::Maintenance));
    }
}
