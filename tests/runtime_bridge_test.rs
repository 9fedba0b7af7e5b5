//! Controller and worker together, against a mocked backend

use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::{ImageFormat, Rgb, RgbImage};
use jobscope::app::{App, PaneContent, StatusLevel, WORDCLOUD_FAILED_TEXT};
use jobscope::core::Session;
use jobscope::domain::Tab;
use jobscope::infrastructure::api::{DashboardApi, Endpoints, HttpApi};
use jobscope::infrastructure::runtime::{RuntimeBridge, WorkerSettings};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    app: App,
    bridge: RuntimeBridge,
}

impl Harness {
    fn new(server: &MockServer, settings: WorkerSettings) -> Self {
        let endpoints = Endpoints::new(&format!("{}/api", server.uri())).unwrap();
        let api = HttpApi::new(
            endpoints.clone(),
            Duration::from_secs(5),
            Duration::from_secs(30),
        )
        .unwrap();
        let api: Arc<dyn DashboardApi> = Arc::new(api);
        Self {
            app: App::new(endpoints, Session::new(5)),
            bridge: RuntimeBridge::new(api, settings).unwrap(),
        }
    }

    /// Shuttle commands and events until `done` holds
    async fn pump_until(&mut self, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            for cmd in self.app.take_commands() {
                self.bridge.send(cmd).unwrap();
            }
            for event in self.bridge.poll_events() {
                self.app.apply_event(event);
            }
            if done(&self.app) {
                return;
            }
            assert!(Instant::now() < deadline, "condition not reached in time");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

async fn mount_crawl(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_crawl_switches_to_statistics() {
    let server = MockServer::start().await;
    mount_crawl(
        &server,
        json!({"success": true, "message": "成功爬取 42 条岗位数据", "total_count": 42}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/stats/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_jobs": 42,
            "company_count": 30
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = Harness::new(&server, WorkerSettings::default());
    h.app.activate_tab(Tab::Jobs);
    h.app.submit_crawl("后端工程师", Some(5)).unwrap();
    h.pump_until(|app| matches!(app.content(Tab::Statistics), PaneContent::Statistics(_)))
        .await;

    assert_eq!(h.app.active_tab, Tab::Statistics);
    assert!(!h.app.crawl_in_flight);
    let status = h.app.crawl_status.as_ref().unwrap();
    assert_eq!(status.message, "成功爬取 42 条岗位数据");
    assert_eq!(status.level, StatusLevel::Success);
    assert_eq!(status.progress, 100);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_crawl_keeps_current_tab() {
    let server = MockServer::start().await;
    mount_crawl(&server, json!({"success": false, "message": "未找到相关岗位"})).await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/stats/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_jobs": 0})))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = Harness::new(&server, WorkerSettings::default());
    h.app.activate_tab(Tab::Analysis);
    h.app.submit_crawl("rust", None).unwrap();
    h.pump_until(|app| !app.crawl_in_flight).await;

    assert_eq!(h.app.active_tab, Tab::Analysis);
    let status = h.app.crawl_status.as_ref().unwrap();
    assert_eq!(status.message, "错误: 未找到相关岗位");
    assert_eq!(status.level, StatusLevel::Error);
}

#[tokio::test(flavor = "multi_thread")]
async fn crawl_timeout_reenables_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/crawl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let settings = WorkerSettings {
        crawl_timeout: Duration::from_millis(200),
        ..WorkerSettings::default()
    };
    let mut h = Harness::new(&server, settings);
    h.app.submit_crawl("rust", None).unwrap();
    h.pump_until(|app| !app.crawl_in_flight).await;

    let status = h.app.crawl_status.as_ref().unwrap();
    assert_eq!(status.level, StatusLevel::Error);
    assert!(status.message.contains("timed out"), "{}", status.message);
    assert!(h.app.submit_crawl("rust", None).is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_becomes_pane_placeholder() {
    let server = MockServer::start().await;
    mount_crawl(&server, json!({"success": true, "message": "ok"})).await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/stats/.+$"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "统计失败: boom"})),
        )
        .mount(&server)
        .await;

    let mut h = Harness::new(&server, WorkerSettings::default());
    h.app.submit_crawl("rust", None).unwrap();
    h.pump_until(|app| matches!(app.content(Tab::Statistics), PaneContent::Failed(_)))
        .await;

    match h.app.content(Tab::Statistics) {
        PaneContent::Failed(message) => assert_eq!(
            message,
            "加载失败: HTTP 500 Internal Server Error: 统计失败: boom"
        ),
        other => panic!("unexpected pane {other:?}"),
    }
    assert!(matches!(h.app.content(Tab::Jobs), PaneContent::Idle));
}

#[tokio::test(flavor = "multi_thread")]
async fn wordcloud_image_is_downloaded_and_decoded() {
    let server = MockServer::start().await;
    mount_crawl(&server, json!({"success": true, "message": "ok"})).await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/stats/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_jobs": 1})))
        .mount(&server)
        .await;

    let img = RgbImage::from_pixel(40, 20, Rgb([200, 100, 50]));
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    Mock::given(method("GET"))
        .and(path("/api/wordcloud/rust"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png, "image/png"))
        .mount(&server)
        .await;

    let mut h = Harness::new(&server, WorkerSettings::default());
    h.app.submit_crawl("rust", None).unwrap();
    h.pump_until(|app| !app.crawl_in_flight).await;

    h.app.activate_tab(Tab::Wordcloud);
    h.pump_until(|app| app.loaded_wordcloud().is_some()).await;

    let image = h.app.loaded_wordcloud().unwrap();
    assert_eq!((image.width, image.height), (40, 20));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_wordcloud_shows_fixed_placeholder() {
    let server = MockServer::start().await;
    mount_crawl(&server, json!({"success": true, "message": "ok"})).await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/stats/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_jobs": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wordcloud/rust"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "暂无数据生成词云"})),
        )
        .mount(&server)
        .await;

    let mut h = Harness::new(&server, WorkerSettings::default());
    h.app.submit_crawl("rust", None).unwrap();
    h.pump_until(|app| !app.crawl_in_flight).await;

    h.app.activate_tab(Tab::Wordcloud);
    h.pump_until(|app| matches!(app.content(Tab::Wordcloud), PaneContent::Failed(_)))
        .await;

    match h.app.content(Tab::Wordcloud) {
        PaneContent::Failed(message) => assert_eq!(message, WORDCLOUD_FAILED_TEXT),
        other => panic!("unexpected pane {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn ping_reports_backend_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "API", "status": "running"})),
        )
        .mount(&server)
        .await;

    let mut h = Harness::new(&server, WorkerSettings::default());
    h.app.ping_backend();
    h.pump_until(|app| app.backend.is_some()).await;

    assert_eq!(
        h.app.backend,
        Some(("running".to_string(), StatusLevel::Success))
    );
}
