use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use jobscope::app::{App, InputMode, PromptKind, StatusLevel};
use jobscope::config;
use jobscope::core::{Command, Session};
use jobscope::domain::Tab;
use jobscope::infrastructure::api::{DashboardApi, Endpoints, HttpApi};
use jobscope::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, WorkerSettings};
use jobscope::{logging, modules, ui};

#[derive(Debug, Parser)]
#[command(
    name = "jobscope",
    version,
    about = "Jobscope: a terminal dashboard for job-posting crawls and analysis"
)]
struct Args {
    /// Backend API base URL (e.g. http://localhost:8000/api)
    #[arg(long)]
    api_base: Option<String>,

    /// Default number of pages per crawl
    #[arg(long)]
    max_pages: Option<u32>,

    /// Submit a crawl for this keyword on startup
    #[arg(long)]
    keyword: Option<String>,

    /// Config file (default: ~/.config/jobscope/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let loaded = config::load(args.config.as_deref());
    let config = loaded.config;

    let _log_guard = logging::init(&config::log_dir(&config), &config.logging.level)
        .context("failed to initialize logging")?;
    if let Some(path) = loaded.path.as_ref() {
        tracing::info!(path = %path.display(), "config path");
    }

    let api_base = args.api_base.as_deref().unwrap_or(&config.api_base_url);
    let endpoints =
        Endpoints::new(api_base).with_context(|| format!("invalid API base URL: {api_base}"))?;
    let api = HttpApi::new(
        endpoints.clone(),
        config.request_timeout(),
        config.crawl_timeout(),
    )
    .context("failed to build HTTP client")?;
    let api: Arc<dyn DashboardApi> = Arc::new(api);

    let settings = WorkerSettings {
        crawl_timeout: config.crawl_timeout(),
        ..WorkerSettings::default()
    };
    let runtime = RuntimeBridge::new(api, settings).context("failed to start worker")?;

    let session = Session::new(args.max_pages.unwrap_or(config.default_max_pages));
    let mut app = App::new(endpoints, session);
    app.export_dir = config::export_dir();
    app.ping_backend();
    match loaded.warning {
        Some(warning) => {
            tracing::warn!("{warning}");
            app.set_status(warning, StatusLevel::Warn);
        }
        None => app.set_status("Connecting…", StatusLevel::Info),
    }
    if let Some(keyword) = args.keyword.as_deref() {
        // Validation failures are reported on the status bar
        let _ = app.submit_crawl(keyword, None);
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("{err:?}");
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime)?;
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime)?;
    }
}

/// Feed worker events into the app, then hand queued commands to the worker
fn pump_background(app: &mut App, runtime: &RuntimeBridge) -> Result<()> {
    for event in runtime.poll_events() {
        app.apply_event(event);
    }
    for cmd in app.take_commands() {
        runtime.send(cmd)?;
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Prompt(kind) => handle_prompt_mode(app, key, kind),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.should_quit = true,
        (KeyCode::Char('?'), _) => app.help_open = true,
        (KeyCode::Char(':'), _) => app.enter_command(),
        (KeyCode::Char('c'), _) | (KeyCode::Enter, _) => app.enter_keyword_prompt(),

        (KeyCode::Char(ch @ '1'..='4'), _) => {
            if let Some(tab) = Tab::from_shortcut(ch) {
                app.activate_tab(tab);
            }
        }
        (KeyCode::Tab, _) => app.cycle_tab(true),
        (KeyCode::BackTab, _) => app.cycle_tab(false),
        (KeyCode::Char('r'), _) => app.refresh(),

        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => app.adjust_max_pages(1),
        (KeyCode::Char('-'), _) => app.adjust_max_pages(-1),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => app.scroll_down(1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => app.scroll_up(1),
        (KeyCode::PageDown, _) => app.scroll_down(page_amount()),
        (KeyCode::PageUp, _) => app.scroll_up(page_amount()),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => app.scroll = 0,

        (KeyCode::Char('e'), _) => {
            let action = modules::export::export_current_view(app, None);
            app.apply_action(action);
        }
        (KeyCode::Char('w'), _) => {
            let action = app.execute_command(&Command::Save(None));
            app.apply_action(action);
        }
        (KeyCode::Char('p'), _) => {
            let action = app.execute_command(&Command::Ping);
            app.apply_action(action);
        }
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.input.push(ch);
        }
        _ => {}
    }
}

fn handle_prompt_mode(app: &mut App, key: KeyEvent, kind: PromptKind) {
    match key.code {
        KeyCode::Esc => app.exit_prompt(),
        KeyCode::Enter => app.apply_prompt(kind),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.input.push(ch);
        }
        _ => {}
    }
}

/// Rows in the pane body, used as the PgUp/PgDn step
fn page_amount() -> u16 {
    let Ok((width, height)) = crossterm::terminal::size() else {
        return 10;
    };
    let areas = ui::layout::areas(ratatui::layout::Rect::new(0, 0, width, height), true);
    areas.pane.height.saturating_sub(2).max(1)
}
