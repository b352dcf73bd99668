use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crous_client::{GeoPoint, SearchArea, DEFAULT_TOOL_ID};

/// Run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    // Matching
    pub keywords: Vec<String>,

    // Search
    pub tool_id: u32,
    pub page_size: u32,
    pub max_pages: u32,
    pub area: SearchArea,

    // Pacing
    pub page_delay: Duration,
    pub chunk_delay: Duration,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            keywords: vec!["marseille".to_string()],
            tool_id: DEFAULT_TOOL_ID,
            page_size: 24,
            max_pages: 100,
            area: SearchArea::MARSEILLE,
            page_delay: Duration::from_millis(500),
            chunk_delay: Duration::from_millis(1000),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys fall back to defaults;
    /// present but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let keywords = match get("MONITOR_KEYWORDS") {
            Some(raw) => parse_keywords(&raw),
            None => defaults.keywords,
        };
        if keywords.is_empty() {
            bail!("MONITOR_KEYWORDS contains no usable keyword");
        }

        let page_size = parse_or(get("CROUS_PAGE_SIZE"), "CROUS_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            bail!("CROUS_PAGE_SIZE must be greater than zero");
        }

        let area = match get("CROUS_AREA") {
            Some(raw) => parse_area(&raw).context("CROUS_AREA must be lon1,lat1,lon2,lat2")?,
            None => defaults.area,
        };

        let http_timeout_secs = parse_or(
            get("HTTP_TIMEOUT_SECS"),
            "HTTP_TIMEOUT_SECS",
            defaults.http_timeout.as_secs(),
        )?;
        if http_timeout_secs == 0 {
            bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            keywords,
            tool_id: parse_or(get("CROUS_TOOL_ID"), "CROUS_TOOL_ID", defaults.tool_id)?,
            page_size,
            max_pages: parse_or(get("CROUS_MAX_PAGES"), "CROUS_MAX_PAGES", defaults.max_pages)?,
            area,
            page_delay: millis_or(get("PAGE_DELAY_MS"), "PAGE_DELAY_MS", defaults.page_delay)?,
            chunk_delay: millis_or(get("CHUNK_DELAY_MS"), "CHUNK_DELAY_MS", defaults.chunk_delay)?,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    /// Bot token and chat id, when both are configured.
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat)) => Some((token.as_str(), chat.as_str())),
            _ => None,
        }
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().take(5).map(char::len_utf8).sum::<usize>();
            format!("{}...({} chars)", &val[..n], val.chars().count())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => preview(v),
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  TELEGRAM_BOT_TOKEN: {}", preview_opt(&self.telegram_bot_token));
        tracing::info!(
            "  TELEGRAM_CHAT_ID: {}",
            self.telegram_chat_id.as_deref().unwrap_or("<not set>")
        );
        tracing::info!("  MONITOR_KEYWORDS: {}", self.keywords.join(","));
        tracing::info!(
            "  search: tool={} page_size={} max_pages={}",
            self.tool_id,
            self.page_size,
            self.max_pages
        );
        tracing::info!(
            "  pacing: page_delay={:?} chunk_delay={:?} http_timeout={:?}",
            self.page_delay,
            self.chunk_delay,
            self.http_timeout
        );
    }
}

/// Split a comma-separated list into lowercase keywords, keeping order and
/// dropping blanks.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn parse_area(raw: &str) -> Result<SearchArea> {
    let values = raw
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let &[lon1, lat1, lon2, lat2] = values.as_slice() else {
        bail!("expected 4 coordinates, got {}", values.len());
    };

    Ok(SearchArea {
        north_west: GeoPoint { lon: lon1, lat: lat1 },
        south_east: GeoPoint { lon: lon2, lat: lat2 },
    })
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {v:?}")),
        None => Ok(default),
    }
}

fn millis_or(raw: Option<String>, key: &str, default: Duration) -> Result<Duration> {
    let ms = parse_or(raw, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}
