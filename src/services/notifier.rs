use super::traits::Notifier;

/// Notifier for headless use: every notice becomes an error log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!(message = %message, "Label workflow error");
    }
}
