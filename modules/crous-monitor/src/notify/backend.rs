use async_trait::async_trait;

/// Chat transport the notifier delivers formatted messages through.
#[async_trait]
pub trait NotifyBackend: Send + Sync {
    /// Longest text, in characters, a single `send` accepts.
    fn max_message_len(&self) -> usize;

    /// False for a backend that delivers nowhere; the notifier then reports
    /// the run's notification as disabled instead of sent.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Deliver one message. Text uses Telegram-style HTML markup.
    async fn send(&self, text: &str) -> anyhow::Result<()>;
}
