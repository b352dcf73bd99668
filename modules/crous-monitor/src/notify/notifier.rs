use std::time::Duration;

use chrono::Local;
use tracing::{info, warn};

use super::backend::NotifyBackend;
use super::message::{format_message, split_message};
use crate::types::{Alert, NotifyOutcome};

/// Formats a run's alerts and delivers them, in order, through one backend.
pub struct Notifier {
    backend: Box<dyn NotifyBackend>,
    chunk_delay: Duration,
}

impl Notifier {
    pub fn new(backend: Box<dyn NotifyBackend>, chunk_delay: Duration) -> Self {
        Self {
            backend,
            chunk_delay,
        }
    }

    /// Send all alerts as one message, split into chunks if it is too long.
    /// Failures are logged and reported in the outcome, never retried.
    pub async fn notify(&self, alerts: &[Alert]) -> NotifyOutcome {
        if alerts.is_empty() {
            info!("No matching listings, nothing to send");
            return NotifyOutcome::Skipped;
        }

        if !self.backend.is_enabled() {
            warn!(
                alerts = alerts.len(),
                "Telegram credentials not set, notification skipped"
            );
            return NotifyOutcome::Disabled;
        }

        let message = format_message(alerts, &Local::now());
        let chunks = split_message(&message, self.backend.max_message_len());
        let total = chunks.len();

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }

            if let Err(e) = self.backend.send(chunk).await {
                warn!(chunk = i + 1, total, error = %e, "Failed to send notification");
                return NotifyOutcome::Failed {
                    sent: i,
                    total,
                    error: e.to_string(),
                };
            }
        }

        info!(alerts = alerts.len(), chunks = total, "Notification sent");
        NotifyOutcome::Sent { chunks: total }
    }
}
