//! Async worker - runs in Tokio runtime and talks to the backend
//!
//! Every command becomes its own task so a slow crawl never holds up tab
//! fetches, and fetches for different tabs proceed independently.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;

use anyhow::Result;

use crate::domain::{CrawlRequest, Tab, WordcloudImage};
use crate::infrastructure::api::{ApiError, DashboardApi};
use crate::infrastructure::runtime::bridge::{
    RequestId, RuntimeCommand, RuntimeEvent, ViewPayload, WorkerSettings,
};

/// Run the async worker loop until `Shutdown` or the command channel closes
pub async fn run_async_worker(
    api: Arc<dyn DashboardApi>,
    settings: WorkerSettings,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let mut poll_interval = tokio::time::interval(settings.poll_interval);
    poll_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        // Process commands (non-blocking)
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };

            match cmd {
                RuntimeCommand::Shutdown => {
                    tracing::debug!("worker shutting down");
                    return Ok(());
                }
                RuntimeCommand::Crawl { keyword, max_pages } => {
                    let api = Arc::clone(&api);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let request = CrawlRequest { keyword, max_pages };
                        let outcome = run_crawl(api.as_ref(), &request, settings).await;
                        let _ = evt_tx.send(RuntimeEvent::CrawlFinished {
                            keyword: request.keyword,
                            outcome,
                        });
                    });
                }
                RuntimeCommand::FetchView {
                    tab,
                    request_id,
                    keyword,
                } => {
                    let api = Arc::clone(&api);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let event = match fetch_view(api.as_ref(), tab, &keyword).await {
                            Ok(payload) => RuntimeEvent::ViewLoaded {
                                tab,
                                request_id,
                                payload,
                            },
                            Err(message) => RuntimeEvent::ViewFailed {
                                tab,
                                request_id,
                                message,
                            },
                        };
                        let _ = evt_tx.send(event);
                    });
                }
                RuntimeCommand::LoadWordcloud { request_id, url } => {
                    let api = Arc::clone(&api);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let event = load_wordcloud(api.as_ref(), request_id, &url).await;
                        let _ = evt_tx.send(event);
                    });
                }
                RuntimeCommand::Ping => {
                    let api = Arc::clone(&api);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let outcome = api.status().await.map_err(|err| err.to_string());
                        let _ = evt_tx.send(RuntimeEvent::BackendStatus { outcome });
                    });
                }
            }
        }

        poll_interval.tick().await;
    }
}

async fn run_crawl(
    api: &dyn DashboardApi,
    request: &CrawlRequest,
    settings: WorkerSettings,
) -> Result<crate::domain::CrawlResult, String> {
    let started = std::time::Instant::now();
    let result = match tokio::time::timeout(settings.crawl_timeout, api.crawl(request)).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout(settings.crawl_timeout)),
    };

    match &result {
        Ok(res) => tracing::info!(
            keyword = %request.keyword,
            success = res.success,
            total = ?res.total_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "crawl finished"
        ),
        Err(err) => tracing::warn!(keyword = %request.keyword, "crawl failed: {err}"),
    }

    result.map_err(|err| err.to_string())
}

async fn fetch_view(api: &dyn DashboardApi, tab: Tab, keyword: &str) -> Result<ViewPayload, String> {
    let result = match tab {
        Tab::Statistics => api.statistics(keyword).await.map(ViewPayload::Statistics),
        Tab::Analysis => api.analysis(keyword).await.map(ViewPayload::Analysis),
        Tab::Jobs => api.jobs(keyword).await.map(ViewPayload::Jobs),
        Tab::Wordcloud => {
            return Err("word cloud is loaded as an image, not a JSON view".to_string());
        }
    };
    result.map_err(|err| {
        tracing::warn!(%tab, %keyword, "fetch failed: {err}");
        err.to_string()
    })
}

async fn load_wordcloud(api: &dyn DashboardApi, request_id: RequestId, url: &str) -> RuntimeEvent {
    let failed = |message: String| RuntimeEvent::ViewFailed {
        tab: Tab::Wordcloud,
        request_id,
        message,
    };

    let body = match api.image(url).await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(%url, "word cloud download failed: {err}");
            return failed(err.to_string());
        }
    };

    // Decoding is CPU work; keep it off the reactor threads
    let decoded = tokio::task::spawn_blocking(move || {
        WordcloudImage::decode(body.bytes, body.content_type)
    })
    .await;

    match decoded {
        Ok(Ok(image)) => RuntimeEvent::ViewLoaded {
            tab: Tab::Wordcloud,
            request_id,
            payload: ViewPayload::Wordcloud(image),
        },
        Ok(Err(err)) => {
            tracing::warn!(%url, "word cloud decode failed: {err}");
            failed(err.to_string())
        }
        Err(err) => failed(format!("decode task failed: {err}")),
    }
}
