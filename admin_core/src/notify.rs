// admin_core/src/notify.rs

use tracing::{error, info};

/// Where user-facing outcome notifications go. The sink is handed to each
/// controller at construction; nothing notification-shaped is global.
pub trait NotifySink: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Production sink: notifications become structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotifySink for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "hospital_admin::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "hospital_admin::notify", "{message}");
    }
}
