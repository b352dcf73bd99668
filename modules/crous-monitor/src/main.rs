use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crous_client::CrousClient;
use crous_monitor::{Config, Monitor, NoopBackend, NotifyBackend, Notifier, TelegramBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("crous_monitor=info".parse()?),
        )
        .init();

    info!("Crous monitor starting...");

    let config = Config::from_env()?;
    config.log_redacted();

    let source = CrousClient::new(config.tool_id, config.http_timeout)?;

    // Telegram if configured, otherwise fetch and filter only
    let backend: Box<dyn NotifyBackend> = match TelegramBackend::from_config(&config)? {
        Some(backend) => {
            info!("Telegram notifications enabled");
            Box::new(backend)
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set, notifications disabled");
            Box::new(NoopBackend)
        }
    };
    let notifier = Notifier::new(backend, config.chunk_delay);

    let monitor = Monitor::new(Box::new(source), notifier, &config);
    let report = monitor.run().await;

    // Best-effort job: partial failures are logged, the exit status stays 0.
    if report.is_clean() {
        info!("Check complete. {report}");
    } else {
        warn!("Check complete with errors. {report}");
    }
    Ok(())
}
