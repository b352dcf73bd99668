use std::fmt;

/// A listing that matched a keyword, ready to be notified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub keyword: String,
    pub listing_id: u64,
    pub title: String,
    pub link: String,
    pub address: String,
    pub price: String,
}

/// What happened to the notification step of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// No alerts, nothing sent.
    Skipped,
    /// No transport configured.
    Disabled,
    Sent { chunks: usize },
    /// `sent` chunks went out before chunk `sent + 1` of `total` failed.
    Failed {
        sent: usize,
        total: usize,
        error: String,
    },
}

impl fmt::Display for NotifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::Disabled => write!(f, "disabled"),
            Self::Sent { chunks } => write!(f, "sent({chunks})"),
            Self::Failed { sent, total, .. } => write!(f, "failed({sent}/{total})"),
        }
    }
}

/// Summary of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub pages: u32,
    pub listings: usize,
    pub skipped: usize,
    pub alerts: Vec<Alert>,
    pub fetch_error: Option<String>,
    pub notify: NotifyOutcome,
}

impl RunReport {
    /// True when every step of the run completed. The binary still exits
    /// normally when this is false.
    pub fn is_clean(&self) -> bool {
        self.fetch_error.is_none() && !matches!(self.notify, NotifyOutcome::Failed { .. })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pages={} listings={} skipped={} alerts={} fetch={} notify={}",
            self.pages,
            self.listings,
            self.skipped,
            self.alerts.len(),
            if self.fetch_error.is_some() { "failed" } else { "ok" },
            self.notify,
        )
    }
}
