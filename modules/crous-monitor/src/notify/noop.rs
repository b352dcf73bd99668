use async_trait::async_trait;

use super::backend::NotifyBackend;

/// Backend used when no chat credentials are configured.
pub struct NoopBackend;

#[async_trait]
impl NotifyBackend for NoopBackend {
    fn max_message_len(&self) -> usize {
        usize::MAX
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn send(&self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
