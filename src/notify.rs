use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Outbound integration hook (CRM hand-off, reminder fan-out). Strictly
/// best-effort: implementations log failures and never surface them, so a
/// broken downstream can never fail a user-facing request.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &str, payload: Value);
}

pub type SharedNotifier = Arc<dyn Notifier>;

/// Default wiring: every event goes to the log stream.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &str, payload: Value) {
        info!(event = %event, payload = %payload, "Dispatching notification");
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    events: std::sync::Mutex<Vec<(String, Value)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, event: &str, payload: Value) {
        self.events.lock().unwrap().push((event.to_string(), payload));
    }
}
