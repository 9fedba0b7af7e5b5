use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Tabs, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod panes;
pub mod widgets;

use crate::app::{App, InputMode, PaneContent, PromptKind, StatusLevel};
use crate::domain::Tab;

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size(), app.crawl_status.is_some());

    draw_header(f, areas.header, app);
    draw_form(f, areas.form, app);
    if app.crawl_status.is_some() {
        draw_crawl_status(f, areas.crawl_status, app);
    }
    draw_tab_bar(f, areas.tabs, app);
    draw_pane(f, areas.pane, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let (backend, color) = match app.backend.as_ref() {
        Some((label, level)) => (label.as_str(), level_color(*level)),
        None => ("--", Color::DarkGray),
    };
    let line = Line::from(vec![
        Span::styled(
            "Jobscope",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("API ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.endpoints().base())),
        Span::styled("●", Style::default().fg(color)),
        Span::raw(format!(" {backend}")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(14),
        ])
        .split(area);

    let editing = app.input_mode == InputMode::Prompt(PromptKind::Keyword);
    let keyword = if editing {
        Line::from(vec![
            Span::raw(app.input.clone()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else {
        match app.session.keyword() {
            Some(keyword) => Line::from(keyword.to_string()),
            None => Line::from(Span::styled(
                "例如: 后端工程师 (c 输入)",
                Style::default().fg(Color::DarkGray),
            )),
        }
    };
    let keyword_border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new(keyword).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(keyword_border)
                .title("岗位关键词"),
        ),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(format!("{}  (+/-)", app.session.default_max_pages)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("最大页数"),
        ),
        chunks[1],
    );

    let (label, style) = if app.crawl_in_flight {
        ("爬取中...", Style::default().fg(Color::DarkGray))
    } else {
        (
            "开始爬取",
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
    };
    f.render_widget(
        Paragraph::new(Span::styled(label, style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );
}

fn draw_crawl_status(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.crawl_status.as_ref() else {
        return;
    };
    let color = level_color(status.level);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(status.message.clone(), Style::default().fg(color))),
        )
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .percent(status.progress.min(100));
    f.render_widget(gauge, area);
}

/// Draw the tab selector; exactly one title carries the highlight
pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled(
                    format!("{}:", tab.shortcut()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(tab.title()),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}

fn draw_pane(f: &mut Frame, area: Rect, app: &App) {
    let tab = app.active_tab;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(tab.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let content = app.content(tab);
    let lines = panes::pane_lines(content, tab);

    if let PaneContent::Wordcloud {
        image: Some(image), ..
    } = content
    {
        let header_height = (lines.len() as u16).min(inner.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_height), Constraint::Min(0)])
            .split(inner);
        f.render_widget(Paragraph::new(lines), chunks[0]);
        f.render_widget(widgets::HalfBlockImage::new(&image.preview), chunks[1]);
        return;
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(paragraph, inner);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let keyword = app.session.keyword().unwrap_or("--").to_string();
    let mut spans = vec![
        Span::styled("Keyword ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{keyword}  ")),
        Span::styled("Pages ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.session.default_max_pages)),
        Span::styled("Tab ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.active_tab.title()),
    ];
    if app.pane(app.active_tab).is_loading() {
        spans.push(Span::styled("  ⟳", Style::default().fg(Color::Yellow)));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::White)),
        area,
    );
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("crawl", "crawl <keyword> [pages]"),
        ("pages", "Set default max pages"),
        ("stats", "Show statistics"),
        ("analysis", "Show analysis"),
        ("wordcloud", "Show word cloud"),
        ("jobs", "Show job list"),
        ("tab", "tab <name>"),
        ("refresh", "Reload current tab"),
        ("export", "export [csv|json]"),
        ("save", "save [path] (word cloud PNG)"),
        ("ping", "Check backend status"),
        ("help", "Show key bindings"),
        ("quit", "Exit"),
    ];

    commands
        .into_iter()
        .find(|(cmd, _)| cmd.starts_with(&input))
        .map(|(_, desc)| desc)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.input).unwrap_or("crawl | stats | export | help");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.input.clone()),
                Span::styled(format!("  {hint}"), Style::default().fg(Color::DarkGray)),
            ])
        }
        InputMode::Prompt(PromptKind::Keyword) => Line::from(vec![
            Span::styled("> 关键词 ", Style::default().fg(Color::LightCyan)),
            Span::raw(app.input.clone()),
            Span::styled(
                format!(
                    "  ({} 页, Enter=爬取 Esc=取消)",
                    app.session.default_max_pages
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Normal => match app.status_text() {
            Some((text, level)) => Line::from(vec![
                Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                Span::styled(text.to_string(), Style::default().fg(level_color(level))),
            ]),
            None => action_hints(),
        },
    };

    f.render_widget(
        Paragraph::new(content).style(Style::default().fg(Color::White)),
        area,
    );
}

fn action_hints() -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let desc = |d: &'static str| Span::styled(d, Style::default().fg(Color::DarkGray));
    Line::from(vec![
        key("c"),
        desc(" crawl  "),
        key("1-4"),
        desc(" tabs  "),
        key("r"),
        desc(" refresh  "),
        key("e"),
        desc(" export  "),
        key(":"),
        desc(" command  "),
        key("?"),
        desc(" help  "),
        key("q"),
        desc(" quit"),
    ])
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Crawl"),
        Line::from("  c / Enter   Edit keyword, Enter to crawl"),
        Line::from("  + / -       Max pages"),
        Line::from(""),
        Line::from("Tabs"),
        Line::from("  1-4         统计数据 / 详细分析 / 词云图 / 岗位列表"),
        Line::from("  Tab / S-Tab Next / previous tab"),
        Line::from("  r           Refresh current tab"),
        Line::from("  j / k       Scroll"),
        Line::from("  PgUp/PgDn   Scroll page"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  e           Export current tab"),
        Line::from("  w           Save word cloud PNG"),
        Line::from("  p           Ping backend"),
        Line::from("  :           Command line"),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :crawl 后端工程师 5"),
        Line::from("  :export csv   :save ~/cloud.png"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn level_color(level: StatusLevel) -> Color {
    match level {
        StatusLevel::Info => Color::LightBlue,
        StatusLevel::Success => Color::LightGreen,
        StatusLevel::Warn => Color::LightYellow,
        StatusLevel::Error => Color::LightRed,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
