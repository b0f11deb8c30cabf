//! Transient user notifications

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Keep at most this many toasts around
const MAX_TOASTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Fire-and-forget notification queue shared by the whole session
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, severity: Severity, message: impl Into<String>) {
        let toast = Toast {
            id: Uuid::new_v4(),
            severity,
            message: message.into(),
            created_at: Utc::now(),
        };
        tracing::debug!("Toast {:?}: {}", toast.severity, toast.message);
        let mut queue = self.lock();
        queue.push_back(toast);
        while queue.len() > MAX_TOASTS {
            queue.pop_front();
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    /// Most recent toast that has not yet expired
    pub fn latest(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Toast> {
        self.lock()
            .back()
            .filter(|toast| now - toast.created_at < ttl)
            .cloned()
    }

    /// All toasts, oldest first
    pub fn all(&self) -> Vec<Toast> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
