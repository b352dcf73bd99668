pub mod backend;
pub mod message;
pub mod noop;
pub mod notifier;
pub mod telegram;

pub use backend::NotifyBackend;
pub use noop::NoopBackend;
pub use notifier::Notifier;
pub use telegram::TelegramBackend;
