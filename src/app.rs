//! Dashboard controller
//!
//! `App` owns all UI state and never touches the network. Operations queue
//! `RuntimeCommand`s (drained by the main loop via [`App::take_commands`]) and
//! worker results come back through [`App::apply_event`].

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::core::{
    Action, Command, ExportFormat, NotifyLevel, SearchContext, Session, ValidationError,
};
use crate::domain::{
    AnalysisView, BackendStatus, CrawlResult, JobListView, StatisticsView, Tab, WordcloudImage,
};
use crate::infrastructure::api::{CacheBuster, Endpoints};
use crate::infrastructure::runtime::{RequestId, RuntimeCommand, RuntimeEvent, ViewPayload};

/// How long the crawl progress bar lingers before dropping back to idle
pub const PROGRESS_RESET_DELAY: Duration = Duration::from_secs(2);
const STATUS_TTL: Duration = Duration::from_secs(3);

pub const PROGRESS_STARTED: u16 = 30;
pub const PROGRESS_DONE: u16 = 100;

pub const NO_DATA_TEXT: &str = "暂无数据，请先爬取";
pub const WORDCLOUD_FAILED_TEXT: &str = "词云生成失败，请确保有数据";
pub const CRAWL_FAILED_TEXT: &str = "爬取失败";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Prompt(PromptKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

/// The crawl status section shown under the form once a crawl was submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatus {
    pub message: String,
    pub level: StatusLevel,
    /// Progress bar fill, 0..=100
    pub progress: u16,
}

/// What a tab pane currently shows
#[derive(Debug, Clone)]
pub enum PaneContent {
    /// No keyword submitted yet
    Idle,
    Loading,
    /// Backend answered with zero records
    Empty,
    /// Fetch failed; holds the full placeholder text
    Failed(String),
    Statistics(StatisticsView),
    Analysis(AnalysisView),
    Jobs(JobListView),
    /// Image URL is known immediately; the image itself arrives later
    Wordcloud {
        url: String,
        image: Option<WordcloudImage>,
    },
}

#[derive(Debug, Clone)]
pub struct Pane {
    pub content: PaneContent,
    /// Latest request issued for this pane; older responses are dropped
    pending: Option<RequestId>,
}

impl Pane {
    fn idle() -> Self {
        Self {
            content: PaneContent::Idle,
            pending: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

pub struct App {
    pub active_tab: Tab,
    pub session: Session,
    pub crawl_in_flight: bool,
    pub crawl_status: Option<CrawlStatus>,
    progress_reset_at: Option<Instant>,
    panes: [Pane; 4],

    pub input_mode: InputMode,
    pub input: String,
    pub status: Option<StatusMessage>,
    pub backend: Option<(String, StatusLevel)>,
    pub help_open: bool,
    pub should_quit: bool,
    pub scroll: u16,
    /// Where `:export` / `:save` write when no path is given
    pub export_dir: PathBuf,

    endpoints: Endpoints,
    cache_buster: CacheBuster,
    next_request_id: RequestId,
    outbox: Vec<RuntimeCommand>,
}

impl App {
    pub fn new(endpoints: Endpoints, session: Session) -> Self {
        Self {
            active_tab: Tab::Statistics,
            session,
            crawl_in_flight: false,
            crawl_status: None,
            progress_reset_at: None,
            panes: [Pane::idle(), Pane::idle(), Pane::idle(), Pane::idle()],
            input_mode: InputMode::Normal,
            input: String::new(),
            status: None,
            backend: None,
            help_open: false,
            should_quit: false,
            scroll: 0,
            export_dir: crate::config::export_dir(),
            endpoints,
            cache_buster: CacheBuster::new(),
            next_request_id: 1,
            outbox: Vec::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn pane(&self, tab: Tab) -> &Pane {
        &self.panes[tab.index()]
    }

    pub fn content(&self, tab: Tab) -> &PaneContent {
        &self.pane(tab).content
    }

    /// Exactly one tab is visible at a time
    pub fn is_tab_visible(&self, tab: Tab) -> bool {
        self.active_tab == tab
    }

    /// Commands queued since the last call, in issue order
    pub fn take_commands(&mut self) -> Vec<RuntimeCommand> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------
    // Crawl
    // ------------------------------------------------------------------

    /// Validate the form and queue one crawl request.
    ///
    /// On error nothing is queued and the state is left as it was, apart from
    /// the status bar message.
    pub fn submit_crawl(
        &mut self,
        keyword: &str,
        max_pages: Option<u32>,
    ) -> Result<(), ValidationError> {
        if self.crawl_in_flight {
            let err = ValidationError::CrawlInFlight;
            self.set_status(err.to_string(), StatusLevel::Warn);
            return Err(err);
        }
        let search = match SearchContext::new(keyword, max_pages, self.session.default_max_pages)
        {
            Ok(search) => search,
            Err(err) => {
                self.set_status(err.to_string(), StatusLevel::Error);
                return Err(err);
            }
        };

        tracing::info!(keyword = %search.keyword, max_pages = search.max_pages, "crawl submitted");
        self.crawl_in_flight = true;
        self.progress_reset_at = None;
        self.crawl_status = Some(CrawlStatus {
            message: format!("正在爬取 \"{}\" 相关岗位...", search.keyword),
            level: StatusLevel::Info,
            progress: PROGRESS_STARTED,
        });
        self.outbox.push(RuntimeCommand::Crawl {
            keyword: search.keyword.clone(),
            max_pages: search.max_pages,
        });
        self.session.begin(search);
        Ok(())
    }

    fn apply_crawl_finished(&mut self, keyword: String, outcome: Result<CrawlResult, String>) {
        self.crawl_in_flight = false;
        self.progress_reset_at = Some(Instant::now() + PROGRESS_RESET_DELAY);
        let progress = self
            .crawl_status
            .as_ref()
            .map(|status| status.progress)
            .unwrap_or(PROGRESS_STARTED);

        match outcome {
            Ok(result) if result.success => {
                tracing::info!(%keyword, total = ?result.total_count, "crawl succeeded");
                self.crawl_status = Some(CrawlStatus {
                    message: result.message,
                    level: StatusLevel::Success,
                    progress: PROGRESS_DONE,
                });
                self.activate_tab(Tab::Statistics);
            }
            Ok(result) => {
                let message = if result.message.trim().is_empty() {
                    CRAWL_FAILED_TEXT.to_string()
                } else {
                    result.message
                };
                self.crawl_status = Some(CrawlStatus {
                    message: format!("错误: {message}"),
                    level: StatusLevel::Error,
                    progress,
                });
            }
            Err(message) => {
                self.crawl_status = Some(CrawlStatus {
                    message: format!("错误: {message}"),
                    level: StatusLevel::Error,
                    progress,
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Tabs
    // ------------------------------------------------------------------

    /// Show `tab` and, if a keyword was submitted, fetch its data
    pub fn activate_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.scroll = 0;
        let Some(search) = self.session.search().cloned() else {
            return;
        };
        self.dispatch(tab, &search);
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let tab = if forward {
            self.active_tab.next()
        } else {
            self.active_tab.prev()
        };
        self.activate_tab(tab);
    }

    /// Re-fetch the active tab
    pub fn refresh(&mut self) {
        if self.session.keyword().is_none() {
            self.set_status("Nothing to refresh: submit a keyword first", StatusLevel::Warn);
            return;
        }
        self.activate_tab(self.active_tab);
    }

    fn dispatch(&mut self, tab: Tab, search: &SearchContext) {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let command = match tab {
            Tab::Wordcloud => {
                let url = self
                    .endpoints
                    .wordcloud(&search.keyword, self.cache_buster.next_token());
                self.panes[tab.index()].content = PaneContent::Wordcloud {
                    url: url.clone(),
                    image: None,
                };
                RuntimeCommand::LoadWordcloud { request_id, url }
            }
            Tab::Statistics | Tab::Analysis | Tab::Jobs => {
                self.panes[tab.index()].content = PaneContent::Loading;
                RuntimeCommand::FetchView {
                    tab,
                    request_id,
                    keyword: search.keyword.clone(),
                }
            }
        };
        self.panes[tab.index()].pending = Some(request_id);
        tracing::debug!(%tab, request_id, keyword = %search.keyword, "dispatch fetch");
        self.outbox.push(command);
    }

    /// Returns the pane if `request_id` is the one it is waiting for
    fn pane_for_response(&mut self, tab: Tab, request_id: RequestId) -> Option<&mut Pane> {
        let pane = &mut self.panes[tab.index()];
        if pane.pending != Some(request_id) {
            tracing::debug!(%tab, request_id, latest = ?pane.pending, "dropping stale response");
            return None;
        }
        pane.pending = None;
        Some(pane)
    }

    fn apply_view_loaded(&mut self, tab: Tab, request_id: RequestId, payload: ViewPayload) {
        let Some(pane) = self.pane_for_response(tab, request_id) else {
            return;
        };

        pane.content = match (tab, payload) {
            (Tab::Statistics, ViewPayload::Statistics(stats)) => {
                if stats.is_empty() {
                    PaneContent::Empty
                } else {
                    PaneContent::Statistics(stats)
                }
            }
            (Tab::Analysis, ViewPayload::Analysis(analysis)) => {
                if analysis.is_empty() {
                    PaneContent::Empty
                } else {
                    PaneContent::Analysis(analysis)
                }
            }
            (Tab::Jobs, ViewPayload::Jobs(jobs)) => {
                if jobs.is_empty() {
                    PaneContent::Empty
                } else {
                    PaneContent::Jobs(jobs)
                }
            }
            (Tab::Wordcloud, ViewPayload::Wordcloud(loaded)) => {
                match std::mem::replace(&mut pane.content, PaneContent::Loading) {
                    PaneContent::Wordcloud { url, .. } => PaneContent::Wordcloud {
                        url,
                        image: Some(loaded),
                    },
                    _ => PaneContent::Failed(WORDCLOUD_FAILED_TEXT.to_string()),
                }
            }
            (tab, payload) => {
                tracing::warn!(%tab, ?payload, "payload does not match tab");
                PaneContent::Failed("加载失败: unexpected payload".to_string())
            }
        };
    }

    fn apply_view_failed(&mut self, tab: Tab, request_id: RequestId, message: String) {
        let Some(pane) = self.pane_for_response(tab, request_id) else {
            return;
        };
        pane.content = match tab {
            // Mirrors the image element's error handler: a fixed placeholder
            Tab::Wordcloud => PaneContent::Failed(WORDCLOUD_FAILED_TEXT.to_string()),
            _ => PaneContent::Failed(format!("加载失败: {message}")),
        };
    }

    // ------------------------------------------------------------------
    // Worker events
    // ------------------------------------------------------------------

    pub fn apply_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::CrawlFinished { keyword, outcome } => {
                self.apply_crawl_finished(keyword, outcome)
            }
            RuntimeEvent::ViewLoaded {
                tab,
                request_id,
                payload,
            } => self.apply_view_loaded(tab, request_id, payload),
            RuntimeEvent::ViewFailed {
                tab,
                request_id,
                message,
            } => self.apply_view_failed(tab, request_id, message),
            RuntimeEvent::BackendStatus { outcome } => self.apply_backend_status(outcome),
            RuntimeEvent::Error { message } => {
                tracing::error!("{message}");
                self.set_status(message, StatusLevel::Error);
            }
        }
    }

    fn apply_backend_status(&mut self, outcome: Result<BackendStatus, String>) {
        self.backend = Some(match outcome {
            Ok(status) => {
                let level = if status.status.eq_ignore_ascii_case("running") {
                    StatusLevel::Success
                } else {
                    StatusLevel::Warn
                };
                let label = if status.status.is_empty() {
                    "online".to_string()
                } else {
                    status.status
                };
                (label, level)
            }
            Err(message) => {
                tracing::warn!("backend unreachable: {message}");
                ("offline".to_string(), StatusLevel::Error)
            }
        });
    }

    pub fn ping_backend(&mut self) {
        self.outbox.push(RuntimeCommand::Ping);
    }

    // ------------------------------------------------------------------
    // Tick / status bar
    // ------------------------------------------------------------------

    pub fn on_tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if let Some(status) = self.status.as_ref() {
            if now.saturating_duration_since(status.since) > STATUS_TTL {
                self.status = None;
            }
        }
        if let Some(reset_at) = self.progress_reset_at {
            if now >= reset_at {
                self.progress_reset_at = None;
                if let Some(status) = self.crawl_status.as_mut() {
                    status.progress = 0;
                }
            }
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn progress(&self) -> u16 {
        self.crawl_status
            .as_ref()
            .map(|status| status.progress)
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Open the keyword field, prefilled with the current keyword
    pub fn enter_keyword_prompt(&mut self) {
        if self.crawl_in_flight {
            self.set_status(ValidationError::CrawlInFlight.to_string(), StatusLevel::Warn);
            return;
        }
        self.input_mode = InputMode::Prompt(PromptKind::Keyword);
        self.input = self.session.keyword().unwrap_or_default().to_string();
    }

    pub fn exit_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn apply_prompt(&mut self, kind: PromptKind) {
        match kind {
            PromptKind::Keyword => {
                let keyword = self.input.clone();
                if self.submit_crawl(&keyword, None).is_ok() {
                    self.exit_prompt();
                }
            }
        }
    }

    pub fn apply_command(&mut self) {
        let input = self.input.trim().to_string();
        self.exit_command();
        if input.is_empty() {
            return;
        }
        let cmd = crate::core::parse_command(&input);
        let action = self.execute_command(&cmd);
        self.apply_action(action);
    }

    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Crawl { keyword, max_pages } => Action::Crawl {
                keyword: keyword.clone(),
                max_pages: *max_pages,
            },
            Command::Pages(pages) => {
                let pages = self.session.set_default_pages(*pages);
                Action::Notify(format!("最大页数: {pages}"), NotifyLevel::Info)
            }
            Command::Tab(tab) => Action::SwitchTab(*tab),
            Command::Refresh => {
                self.refresh();
                Action::None
            }
            Command::Export(format) => {
                crate::modules::export::export_current_view(self, *format)
            }
            Command::Save(path) => {
                crate::modules::export::save_wordcloud(self, path.as_deref().map(PathBuf::from))
            }
            Command::Ping => {
                self.ping_backend();
                Action::Notify("Pinging backend…".to_string(), NotifyLevel::Info)
            }
            Command::Help => Action::Help,
            Command::Quit => Action::Quit,
            Command::Unknown(input) => {
                Action::Notify(format!("Unknown command: {input}"), NotifyLevel::Warn)
            }
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::SwitchTab(tab) => self.activate_tab(tab),
            Action::Crawl { keyword, max_pages } => {
                // Validation errors are already on the status bar
                let _ = self.submit_crawl(&keyword, max_pages);
            }
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => StatusLevel::Info,
                    NotifyLevel::Warn => StatusLevel::Warn,
                    NotifyLevel::Error => StatusLevel::Error,
                };
                self.set_status(msg, level);
            }
            Action::Help => self.help_open = !self.help_open,
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn adjust_max_pages(&mut self, delta: i32) {
        let pages = self.session.adjust_default_pages(delta);
        self.set_status(format!("最大页数: {pages}"), StatusLevel::Info);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll = self.scroll.saturating_add(amount);
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    // ------------------------------------------------------------------
    // Loaded data accessors (export)
    // ------------------------------------------------------------------

    pub fn loaded_statistics(&self) -> Option<&StatisticsView> {
        match self.content(Tab::Statistics) {
            PaneContent::Statistics(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn loaded_analysis(&self) -> Option<&AnalysisView> {
        match self.content(Tab::Analysis) {
            PaneContent::Analysis(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn loaded_jobs(&self) -> Option<&JobListView> {
        match self.content(Tab::Jobs) {
            PaneContent::Jobs(jobs) => Some(jobs),
            _ => None,
        }
    }

    pub fn loaded_wordcloud(&self) -> Option<&WordcloudImage> {
        match self.content(Tab::Wordcloud) {
            PaneContent::Wordcloud {
                image: Some(image), ..
            } => Some(image),
            _ => None,
        }
    }

    pub fn export_format_for_active_tab(&self) -> ExportFormat {
        match self.active_tab {
            Tab::Jobs => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Endpoints::default(), Session::default())
    }

    #[test]
    fn test_status_message_expires() {
        let mut app = app();
        app.set_status("hello", StatusLevel::Info);
        let since = app.status.as_ref().unwrap().since;

        app.tick_at(since + Duration::from_secs(1));
        assert!(app.status.is_some());
        app.tick_at(since + Duration::from_secs(4));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_backend_status_levels() {
        let mut app = app();
        app.apply_event(RuntimeEvent::BackendStatus {
            outcome: Ok(BackendStatus {
                message: "API".to_string(),
                status: "running".to_string(),
            }),
        });
        assert_eq!(app.backend, Some(("running".to_string(), StatusLevel::Success)));

        app.apply_event(RuntimeEvent::BackendStatus {
            outcome: Err("connection refused".to_string()),
        });
        assert_eq!(app.backend, Some(("offline".to_string(), StatusLevel::Error)));
    }

    #[test]
    fn test_mismatched_payload_fails_pane() {
        let mut app = app();
        app.submit_crawl("rust", None).unwrap();
        app.take_commands();
        app.activate_tab(Tab::Analysis);
        let request_id = match app.take_commands().as_slice() {
            [RuntimeCommand::FetchView { request_id, .. }] => *request_id,
            other => panic!("unexpected commands {other:?}"),
        };

        app.apply_event(RuntimeEvent::ViewLoaded {
            tab: Tab::Analysis,
            request_id,
            payload: ViewPayload::Jobs(JobListView::default()),
        });
        assert!(matches!(app.content(Tab::Analysis), PaneContent::Failed(_)));
        assert!(!app.pane(Tab::Analysis).is_loading());
    }

    #[test]
    fn test_refresh_without_keyword_warns() {
        let mut app = app();
        app.refresh();
        assert!(app.take_commands().is_empty());
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
    }

    #[test]
    fn test_pages_command_sets_default() {
        let mut app = app();
        let action = app.execute_command(&Command::Pages(12));
        assert_eq!(app.session.default_max_pages, 12);
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Info)));
    }
}
