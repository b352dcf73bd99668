use async_trait::async_trait;
use telegram_client::{ParseMode, TelegramClient, MAX_MESSAGE_LEN};

use super::backend::NotifyBackend;
use crate::config::Config;

/// Telegram bot backend posting to a single chat.
pub struct TelegramBackend {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramBackend {
    pub fn new(client: TelegramClient, chat_id: String) -> Self {
        Self { client, chat_id }
    }

    /// Build from config. `Ok(None)` when the bot token or chat id is missing.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        let Some((token, chat_id)) = config.telegram_credentials() else {
            return Ok(None);
        };
        let client = TelegramClient::new(token, config.http_timeout)?;
        Ok(Some(Self::new(client, chat_id.to_string())))
    }
}

#[async_trait]
impl NotifyBackend for TelegramBackend {
    fn max_message_len(&self) -> usize {
        MAX_MESSAGE_LEN
    }

    async fn send(&self, text: &str) -> anyhow::Result<()> {
        self.client
            .send_message(&self.chat_id, text, Some(ParseMode::Html))
            .await?;
        Ok(())
    }
}
