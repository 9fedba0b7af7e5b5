//! Dashboard controller behaviour, driven with synthetic worker events

use std::time::{Duration, Instant};

use jobscope::app::{App, InputMode, PaneContent, StatusLevel, NO_DATA_TEXT};
use jobscope::core::{Session, ValidationError};
use jobscope::domain::{AnalysisView, CrawlResult, JobListView, JobPosting, StatisticsView, Tab};
use jobscope::infrastructure::api::Endpoints;
use jobscope::infrastructure::runtime::{RequestId, RuntimeCommand, RuntimeEvent, ViewPayload};

fn app() -> App {
    App::new(Endpoints::default(), Session::new(5))
}

fn crawled(result: CrawlResult) -> RuntimeEvent {
    RuntimeEvent::CrawlFinished {
        keyword: "后端工程师".to_string(),
        outcome: Ok(result),
    }
}

fn success() -> CrawlResult {
    CrawlResult {
        success: true,
        message: "成功爬取 42 条岗位数据".to_string(),
        total_count: Some(42),
        job_ids: None,
    }
}

/// Request id of the single fetch queued for `tab`
fn fetch_id(commands: &[RuntimeCommand], tab: Tab) -> RequestId {
    let ids: Vec<RequestId> = commands
        .iter()
        .filter_map(|cmd| match cmd {
            RuntimeCommand::FetchView { tab: t, request_id, .. } if *t == tab => Some(*request_id),
            RuntimeCommand::LoadWordcloud { request_id, .. } if tab == Tab::Wordcloud => {
                Some(*request_id)
            }
            _ => None,
        })
        .collect();
    assert_eq!(ids.len(), 1, "expected one fetch for {tab}, got {commands:?}");
    ids[0]
}

fn stats(total: u64) -> StatisticsView {
    StatisticsView {
        total_jobs: total,
        company_count: total / 2,
        ..Default::default()
    }
}

#[test]
fn blank_keyword_is_rejected_without_side_effects() {
    let mut app = app();
    for keyword in ["", "   ", "\t"] {
        assert_eq!(
            app.submit_crawl(keyword, Some(5)),
            Err(ValidationError::EmptyKeyword)
        );
    }
    assert!(app.take_commands().is_empty());
    assert!(!app.crawl_in_flight);
    assert!(app.crawl_status.is_none());
    assert_eq!(app.status_text(), Some(("请输入岗位关键词", StatusLevel::Error)));
}

#[test]
fn submit_queues_exactly_one_crawl() {
    let mut app = app();
    app.submit_crawl("  后端工程师 ", Some(5)).unwrap();

    assert_eq!(
        app.take_commands(),
        vec![RuntimeCommand::Crawl {
            keyword: "后端工程师".to_string(),
            max_pages: 5
        }]
    );
    assert!(app.crawl_in_flight);
    assert_eq!(app.session.keyword(), Some("后端工程师"));
    let status = app.crawl_status.as_ref().unwrap();
    assert_eq!(status.message, "正在爬取 \"后端工程师\" 相关岗位...");
    assert_eq!(status.progress, 30);
}

#[test]
fn page_count_is_sent_as_typed() {
    let mut app = app();
    app.submit_crawl("后端工程师", Some(100)).unwrap();
    assert_eq!(
        app.take_commands(),
        vec![RuntimeCommand::Crawl {
            keyword: "后端工程师".to_string(),
            max_pages: 100
        }]
    );
}

#[test]
fn zero_pages_fall_back_to_default() {
    let mut app = app();
    let default_pages = app.session.default_max_pages;
    app.submit_crawl("rust", Some(0)).unwrap();
    assert_eq!(
        app.take_commands(),
        vec![RuntimeCommand::Crawl {
            keyword: "rust".to_string(),
            max_pages: default_pages
        }]
    );
}

#[test]
fn second_submit_while_in_flight_is_refused() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.take_commands();

    assert_eq!(
        app.submit_crawl("go", None),
        Err(ValidationError::CrawlInFlight)
    );
    assert!(app.take_commands().is_empty());
    assert_eq!(app.session.keyword(), Some("rust"));
}

#[test]
fn successful_crawl_activates_statistics_once() {
    let mut app = app();
    app.activate_tab(Tab::Jobs);
    app.submit_crawl("后端工程师", None).unwrap();
    app.take_commands();

    app.apply_event(crawled(success()));

    let commands = app.take_commands();
    assert_eq!(commands.len(), 1);
    fetch_id(&commands, Tab::Statistics);
    assert_eq!(app.active_tab, Tab::Statistics);
    assert!(matches!(app.content(Tab::Statistics), PaneContent::Loading));
    assert!(!app.crawl_in_flight);
    assert_eq!(app.progress(), 100);
}

#[test]
fn failed_crawl_reports_and_keeps_tab() {
    let mut app = app();
    app.activate_tab(Tab::Analysis);
    app.submit_crawl("rust", None).unwrap();
    app.take_commands();

    app.apply_event(crawled(CrawlResult {
        success: false,
        message: String::new(),
        ..Default::default()
    }));

    assert!(app.take_commands().is_empty());
    assert_eq!(app.active_tab, Tab::Analysis);
    assert!(!app.crawl_in_flight);
    let status = app.crawl_status.as_ref().unwrap();
    assert_eq!(status.message, "错误: 爬取失败");
    assert_eq!(status.level, StatusLevel::Error);
}

#[test]
fn transport_error_reports_message() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.apply_event(RuntimeEvent::CrawlFinished {
        keyword: "rust".to_string(),
        outcome: Err("request failed: connection refused".to_string()),
    });

    assert_eq!(
        app.crawl_status.as_ref().unwrap().message,
        "错误: request failed: connection refused"
    );
    assert!(app.submit_crawl("rust", None).is_ok());
}

#[test]
fn progress_resets_two_seconds_after_crawl() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.apply_event(crawled(success()));
    assert_eq!(app.progress(), 100);

    let now = Instant::now();
    app.tick_at(now + Duration::from_millis(500));
    assert_eq!(app.progress(), 100);

    app.tick_at(now + Duration::from_millis(2_100));
    assert_eq!(app.progress(), 0);
}

#[test]
fn tabs_without_keyword_do_not_fetch() {
    let mut app = app();
    for tab in Tab::ALL {
        app.activate_tab(tab);
        assert!(app.is_tab_visible(tab));
        assert_eq!(
            Tab::ALL.iter().filter(|t| app.is_tab_visible(**t)).count(),
            1
        );
        assert!(matches!(app.content(tab), PaneContent::Idle));
    }
    assert!(app.take_commands().is_empty());
}

#[test]
fn each_activation_dispatches_one_fetch() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.take_commands();

    for tab in [Tab::Analysis, Tab::Jobs, Tab::Statistics] {
        app.activate_tab(tab);
        let commands = app.take_commands();
        assert_eq!(commands.len(), 1);
        fetch_id(&commands, tab);
    }
}

#[test]
fn empty_payloads_show_no_data_placeholder() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.take_commands();

    app.activate_tab(Tab::Statistics);
    let id = fetch_id(&app.take_commands(), Tab::Statistics);
    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Statistics,
        request_id: id,
        payload: ViewPayload::Statistics(stats(0)),
    });
    assert!(matches!(app.content(Tab::Statistics), PaneContent::Empty));

    app.activate_tab(Tab::Analysis);
    let id = fetch_id(&app.take_commands(), Tab::Analysis);
    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Analysis,
        request_id: id,
        payload: ViewPayload::Analysis(AnalysisView {
            message: Some("暂无数据".to_string()),
            ..Default::default()
        }),
    });
    assert!(matches!(app.content(Tab::Analysis), PaneContent::Empty));

    app.activate_tab(Tab::Jobs);
    let id = fetch_id(&app.take_commands(), Tab::Jobs);
    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Jobs,
        request_id: id,
        payload: ViewPayload::Jobs(JobListView::default()),
    });
    assert!(matches!(app.content(Tab::Jobs), PaneContent::Empty));
    assert_eq!(NO_DATA_TEXT, "暂无数据，请先爬取");
}

#[test]
fn failure_is_isolated_to_its_pane() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.apply_event(crawled(success()));
    let stats_id = fetch_id(&app.take_commands(), Tab::Statistics);
    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Statistics,
        request_id: stats_id,
        payload: ViewPayload::Statistics(stats(10)),
    });

    app.activate_tab(Tab::Jobs);
    let jobs_id = fetch_id(&app.take_commands(), Tab::Jobs);
    app.apply_event(RuntimeEvent::ViewFailed {
        tab: Tab::Jobs,
        request_id: jobs_id,
        message: "request failed: connection reset".to_string(),
    });

    match app.content(Tab::Jobs) {
        PaneContent::Failed(message) => {
            assert_eq!(message, "加载失败: request failed: connection reset")
        }
        other => panic!("unexpected pane {other:?}"),
    }
    assert!(matches!(
        app.content(Tab::Statistics),
        PaneContent::Statistics(_)
    ));
    assert!(matches!(app.content(Tab::Analysis), PaneContent::Idle));
}

#[test]
fn stale_response_is_discarded() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.take_commands();

    app.activate_tab(Tab::Jobs);
    let first = fetch_id(&app.take_commands(), Tab::Jobs);
    app.activate_tab(Tab::Jobs);
    let second = fetch_id(&app.take_commands(), Tab::Jobs);
    assert!(second > first);

    let jobs = |title: &str| {
        ViewPayload::Jobs(JobListView {
            count: 1,
            jobs: vec![JobPosting {
                title: Some(title.to_string()),
                ..Default::default()
            }],
        })
    };

    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Jobs,
        request_id: second,
        payload: jobs("new"),
    });
    // The superseded request lands last and must not win
    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Jobs,
        request_id: first,
        payload: jobs("old"),
    });
    app.apply_event(RuntimeEvent::ViewFailed {
        tab: Tab::Jobs,
        request_id: first,
        message: "late failure".to_string(),
    });

    match app.content(Tab::Jobs) {
        PaneContent::Jobs(list) => assert_eq!(list.jobs[0].display_title(), "new"),
        other => panic!("unexpected pane {other:?}"),
    }
}

#[test]
fn rerender_after_second_crawl_replaces_data() {
    let mut app = app();
    app.submit_crawl("rust", None).unwrap();
    app.apply_event(crawled(success()));
    let id = fetch_id(&app.take_commands(), Tab::Statistics);
    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Statistics,
        request_id: id,
        payload: ViewPayload::Statistics(stats(10)),
    });

    app.submit_crawl("go", None).unwrap();
    app.take_commands();
    app.apply_event(crawled(success()));
    let id = fetch_id(&app.take_commands(), Tab::Statistics);
    app.apply_event(RuntimeEvent::ViewLoaded {
        tab: Tab::Statistics,
        request_id: id,
        payload: ViewPayload::Statistics(stats(99)),
    });

    match app.content(Tab::Statistics) {
        PaneContent::Statistics(view) => assert_eq!(view.total_jobs, 99),
        other => panic!("unexpected pane {other:?}"),
    }
}

#[test]
fn wordcloud_url_changes_on_every_activation() {
    let mut app = app();
    app.submit_crawl("后端工程师", None).unwrap();
    app.take_commands();

    let mut urls = Vec::new();
    for _ in 0..3 {
        app.activate_tab(Tab::Wordcloud);
        let commands = app.take_commands();
        match commands.as_slice() {
            [RuntimeCommand::LoadWordcloud { url, .. }] => urls.push(url.clone()),
            other => panic!("unexpected commands {other:?}"),
        }
        match app.content(Tab::Wordcloud) {
            PaneContent::Wordcloud { url, image } => {
                assert_eq!(Some(url), urls.last());
                assert!(image.is_none());
            }
            other => panic!("unexpected pane {other:?}"),
        }
    }

    assert!(urls[0].starts_with(
        "http://localhost:8000/api/wordcloud/%E5%90%8E%E7%AB%AF%E5%B7%A5%E7%A8%8B%E5%B8%88?t="
    ));
    assert_ne!(urls[0], urls[1]);
    assert_ne!(urls[1], urls[2]);
}

#[test]
fn command_line_drives_controller() {
    let mut app = app();
    app.enter_command();
    app.input = "crawl 后端工程师 8".to_string();
    app.apply_command();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(
        app.take_commands(),
        vec![RuntimeCommand::Crawl {
            keyword: "后端工程师".to_string(),
            max_pages: 8
        }]
    );

    app.enter_command();
    app.input = "bogus".to_string();
    app.apply_command();
    assert_eq!(
        app.status_text(),
        Some(("Unknown command: bogus", StatusLevel::Warn))
    );
}

#[test]
fn keyword_prompt_submits_with_default_pages() {
    let mut app = app();
    app.adjust_max_pages(2);
    app.enter_keyword_prompt();
    app.input = "数据分析".to_string();
    app.apply_prompt(jobscope::app::PromptKind::Keyword);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(
        app.take_commands(),
        vec![RuntimeCommand::Crawl {
            keyword: "数据分析".to_string(),
            max_pages: 7
        }]
    );
}

#[test]
fn empty_prompt_stays_open() {
    let mut app = app();
    app.enter_keyword_prompt();
    app.input = "   ".to_string();
    app.apply_prompt(jobscope::app::PromptKind::Keyword);

    assert!(matches!(app.input_mode, InputMode::Prompt(_)));
    assert!(app.take_commands().is_empty());
}
