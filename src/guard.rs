use dashmap::DashSet;
use std::sync::Arc;
use tracing::warn;

/// Tracks mutations currently in flight so a repeated click or resubmitted
/// form cannot trigger the same backend call twice.
#[derive(Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<DashSet<(String, String)>>,
}

/// Held for the duration of one backend call; releases the slot on drop.
pub struct SubmissionTicket {
    in_flight: Arc<DashSet<(String, String)>>,
    key: (String, String),
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while the same action on the same record is already running
    /// for this scope.
    pub fn acquire(&self, scope: &str, action: &str) -> Option<SubmissionTicket> {
        let key = (scope.to_string(), action.to_string());
        if !self.in_flight.insert(key.clone()) {
            warn!("duplicate {action} submission rejected while one is in flight");
            return None;
        }
        Some(SubmissionTicket {
            in_flight: Arc::clone(&self.in_flight),
            key,
        })
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}
