pub mod error;

pub use error::{Result, TelegramError};

use std::time::Duration;

use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://api.telegram.org";

/// Maximum length of a single message text, in characters.
pub const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
    disable_web_page_preview: bool,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<u16>,
}

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: &str, timeout: Duration) -> Result<Self> {
        Self::with_base_url(BASE_URL, token, timeout)
    }

    pub fn with_base_url(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Send a text message to a chat. Link previews are always disabled.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<()> {
        let body = SendMessage {
            chat_id,
            text,
            parse_mode,
            disable_web_page_preview: true,
        };

        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            // reqwest errors embed the URL, which carries the bot token.
            .map_err(|e| TelegramError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| TelegramError::Network(e.without_url().to_string()))?;

        let envelope: ApiResponse = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    status: status.as_u16(),
                    message: raw,
                });
            }
            Err(e) => return Err(e.into()),
        };

        check_envelope(status.as_u16(), envelope)?;
        tracing::debug!(chat_id, chars = text.chars().count(), "Telegram message sent");
        Ok(())
    }
}

fn check_envelope(status: u16, envelope: ApiResponse) -> Result<()> {
    if envelope.ok && (200..300).contains(&status) {
        return Ok(());
    }
    Err(TelegramError::Api {
        status: envelope.error_code.unwrap_or(status),
        message: envelope
            .description
            .unwrap_or_else(|| "request rejected".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_embeds_token() {
        let client =
            TelegramClient::with_base_url("http://localhost:8081/", "123:abc", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            client.method_url("sendMessage"),
            "http://localhost:8081/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn send_message_body_shape() {
        let body = SendMessage {
            chat_id: "-10042",
            text: "<b>hi</b>",
            parse_mode: Some(ParseMode::Html),
            disable_web_page_preview: true,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["chat_id"], "-10042");
        assert_eq!(value["parse_mode"], "HTML");
        assert_eq!(value["disable_web_page_preview"], true);

        let plain = SendMessage {
            parse_mode: None,
            ..body
        };
        assert!(serde_json::to_value(&plain).unwrap().get("parse_mode").is_none());
    }

    #[test]
    fn rejected_envelope_carries_description() {
        let envelope: ApiResponse = serde_json::from_str(
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .unwrap();
        match check_envelope(400, envelope) {
            Err(TelegramError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request: chat not found");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn ok_envelope_passes() {
        let envelope: ApiResponse = serde_json::from_str(r#"{"ok":true,"result":{}}"#).unwrap();
        assert!(check_envelope(200, envelope).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_error_hides_token() {
        let client = TelegramClient::with_base_url(
            "http://127.0.0.1:1",
            "999:secret-token",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client
            .send_message("1", "hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TelegramError::Network(_)));
        assert!(!err.to_string().contains("secret-token"));
    }
}
