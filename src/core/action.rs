//! Actions that commands return to communicate with the app

use crate::domain::Tab;

/// Actions returned by command execution to describe state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Activate a tab (and fetch its data if a keyword is set)
    SwitchTab(Tab),

    /// Submit the crawl form
    Crawl {
        keyword: String,
        max_pages: Option<u32>,
    },

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Toggle the help popup
    Help,

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
