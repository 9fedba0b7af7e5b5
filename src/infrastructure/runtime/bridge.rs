//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI thread never blocks on the network: it sends `RuntimeCommand`s and
//! drains `RuntimeEvent`s once per frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::domain::{
    AnalysisView, BackendStatus, CrawlResult, JobListView, StatisticsView, Tab, WordcloudImage,
};
use crate::infrastructure::api::DashboardApi;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Identifies one dispatched fetch; ids only ever grow
pub type RequestId = u64;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCommand {
    /// Trigger a crawl job
    Crawl { keyword: String, max_pages: u32 },
    /// Fetch the JSON view behind a data tab (statistics, analysis, jobs)
    FetchView {
        tab: Tab,
        request_id: RequestId,
        keyword: String,
    },
    /// Download and decode the word-cloud image
    LoadWordcloud { request_id: RequestId, url: String },
    /// Ask the backend root for its status
    Ping,
    /// Shutdown the worker
    Shutdown,
}

/// A successfully loaded tab payload
#[derive(Debug, Clone)]
pub enum ViewPayload {
    Statistics(StatisticsView),
    Analysis(AnalysisView),
    Jobs(JobListView),
    Wordcloud(WordcloudImage),
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Crawl call finished (successfully or not)
    CrawlFinished {
        keyword: String,
        outcome: Result<CrawlResult, String>,
    },
    /// A tab fetch produced data
    ViewLoaded {
        tab: Tab,
        request_id: RequestId,
        payload: ViewPayload,
    },
    /// A tab fetch failed
    ViewFailed {
        tab: Tab,
        request_id: RequestId,
        message: String,
    },
    /// Backend root answered (or did not)
    BackendStatus { outcome: Result<BackendStatus, String> },
    /// Error occurred outside any particular request
    Error { message: String },
}

/// Worker tuning
#[derive(Debug, Clone, Copy)]
pub struct WorkerSettings {
    /// Upper bound on a crawl call; expiry is reported as a failed crawl
    pub crawl_timeout: Duration,
    /// How often the worker checks the command channel
    pub poll_interval: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            crawl_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_millis(25),
        }
    }
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime
    pub fn new(api: Arc<dyn DashboardApi>, settings: WorkerSettings) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = Runtime::new()?;
        thread::Builder::new()
            .name("jobscope-worker".into())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(api, settings, cmd_rx, evt_tx.clone()).await
                    {
                        tracing::error!("worker exited: {err:#}");
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Try to receive a single event (non-blocking)
    pub fn try_recv(&self) -> Option<RuntimeEvent> {
        self.evt_rx.try_recv().ok()
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
