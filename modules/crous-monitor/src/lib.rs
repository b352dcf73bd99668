pub mod config;
pub mod fetcher;
pub mod filter;
pub mod monitor;
pub mod notify;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::Config;
pub use fetcher::{FetchSummary, ListingFetcher};
pub use filter::KeywordFilter;
pub use monitor::Monitor;
pub use notify::{NoopBackend, NotifyBackend, Notifier, TelegramBackend};
pub use traits::ListingSource;
pub use types::{Alert, NotifyOutcome, RunReport};
