//! Text content of the four tab panes
//!
//! Everything here is a pure function of [`PaneContent`]; drawing the same
//! content twice yields the same lines.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::app::{PaneContent, NO_DATA_TEXT};
use crate::domain::{AnalysisView, JobListView, JobPosting, StatisticsView, Tab};
use crate::ui::widgets::bar_text;

pub const IDLE_TEXT: &str = "请输入岗位关键词并开始爬取";
pub const DESCRIPTION_MAX_CHARS: usize = 200;
const BAR_WIDTH: usize = 24;

pub fn loading_text(tab: Tab) -> &'static str {
    match tab {
        Tab::Statistics | Tab::Jobs => "加载中",
        Tab::Analysis => "分析中",
        Tab::Wordcloud => "生成词云中",
    }
}

pub fn pane_lines(content: &PaneContent, tab: Tab) -> Vec<Line<'static>> {
    match content {
        PaneContent::Idle => vec![muted(IDLE_TEXT)],
        PaneContent::Loading => vec![loading(tab)],
        PaneContent::Empty => vec![error_line(NO_DATA_TEXT)],
        PaneContent::Failed(message) => vec![error_line(message)],
        PaneContent::Statistics(stats) => statistics_lines(stats),
        PaneContent::Analysis(analysis) => analysis_lines(analysis),
        PaneContent::Jobs(jobs) => job_lines(jobs),
        PaneContent::Wordcloud { url, image } => {
            let mut lines = vec![Line::from(vec![
                Span::styled("URL ", Style::default().fg(Color::DarkGray)),
                Span::raw(url.clone()),
            ])];
            match image {
                Some(image) => lines.push(Line::from(vec![
                    Span::styled("Size ", Style::default().fg(Color::DarkGray)),
                    Span::raw(image.size_label()),
                ])),
                None => lines.push(loading(tab)),
            }
            lines
        }
    }
}

fn statistics_lines(stats: &StatisticsView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        card("总岗位数", stats.total_jobs.to_string()),
        Span::raw("    "),
        card("公司数量", stats.company_count.to_string()),
    ])];

    if let Some(salary) = stats.salary_cards() {
        lines.push(Line::from(vec![
            card("平均薪资", salary_k(Some(salary.avg))),
            Span::raw("    "),
            card("薪资中位数", salary_k(salary.median)),
        ]));
    }

    let distribution = stats.salary_distribution();
    if !distribution.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("薪资分布"));
        let width = label_width(distribution.iter().map(|bucket| bucket.range.as_str()));
        for bucket in distribution {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}  ", pad(&bucket.range, width))),
                Span::styled(
                    format!("{:<BAR_WIDTH$}", bar_text(bucket.percentage, 100.0, BAR_WIDTH)),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(format!(" {}个岗位 ({}%)", bucket.count, bucket.percentage)),
            ]));
        }
    }

    if !stats.area_distribution.is_empty() {
        let rows: Vec<(&str, u64)> = stats
            .area_distribution
            .iter()
            .map(|item| (item.display_area(), item.count))
            .collect();
        count_block(&mut lines, "地区分布 Top 10", &rows);
    }

    if !stats.experience_distribution.is_empty() {
        let rows: Vec<(&str, u64)> = stats
            .experience_distribution
            .iter()
            .map(|item| (item.display_experience(), item.count))
            .collect();
        count_block(&mut lines, "经验要求", &rows);
    }

    if !stats.education_distribution.is_empty() {
        let rows: Vec<(&str, u64)> = stats
            .education_distribution
            .iter()
            .map(|item| (item.display_education(), item.count))
            .collect();
        count_block(&mut lines, "学历要求", &rows);
    }

    lines
}

fn analysis_lines(analysis: &AnalysisView) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("基础信息"),
        field("关键词", analysis.keyword.clone()),
        field("总岗位数", analysis.total_jobs.unwrap_or(0).to_string()),
        field("分析时间", analysis.display_time().to_string()),
    ];

    if !analysis.top_keywords.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("热门关键词"));
        let words: Vec<String> = analysis
            .top_keywords
            .iter()
            .map(|item| format!("{} ({:.2})", item.word, item.weight))
            .collect();
        lines.extend(wrap_chips(&words, Color::LightCyan));
    }

    if !analysis.required_skills.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("技能需求"));
        let skills: Vec<String> = analysis
            .required_skills
            .iter()
            .map(|item| format!("{} ({}次)", item.skill, item.count))
            .collect();
        lines.extend(wrap_chips(&skills, Color::LightGreen));
    }

    if let Some(salary) = analysis.salary_range_analysis.as_ref() {
        lines.push(Line::from(""));
        lines.push(heading("薪资分析"));
        lines.push(field("平均薪资", salary_k(salary.avg)));
        lines.push(field(
            "薪资范围",
            format!("{} - {}", salary_k(salary.min), salary_k(salary.max)),
        ));
        lines.push(field("中位数", salary_k(salary.median)));
    }

    lines
}

fn job_lines(jobs: &JobListView) -> Vec<Line<'static>> {
    let mut lines = vec![heading(&format!("共找到 {} 个岗位", jobs.count))];
    for job in &jobs.jobs {
        lines.push(Line::from(""));
        lines.extend(job_card(job));
    }
    lines
}

fn job_card(job: &JobPosting) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            job.display_title().to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            job.display_company().to_string(),
            Style::default().fg(Color::Cyan),
        )),
    ];

    let mut info = Vec::new();
    if let Some(salary) = job.salary() {
        info.push(Span::styled(
            salary.to_string(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ));
    }
    for value in [job.area(), job.experience(), job.education()]
        .into_iter()
        .flatten()
    {
        if !info.is_empty() {
            info.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
        }
        info.push(Span::raw(value.to_string()));
    }
    if !info.is_empty() {
        lines.push(Line::from(info));
    }

    if let Some(excerpt) = job.description_excerpt(DESCRIPTION_MAX_CHARS) {
        lines.push(Line::from(Span::styled(
            excerpt,
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

fn count_block(lines: &mut Vec<Line<'static>>, title: &str, rows: &[(&str, u64)]) {
    lines.push(Line::from(""));
    lines.push(heading(title));
    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(0) as f64;
    let width = label_width(rows.iter().map(|(label, _)| *label));
    for (label, count) in rows {
        lines.push(Line::from(vec![
            Span::raw(format!("  {}  ", pad(label, width))),
            Span::styled(
                format!("{:<BAR_WIDTH$}", bar_text(*count as f64, max, BAR_WIDTH)),
                Style::default().fg(Color::Blue),
            ),
            Span::styled(
                format!(" {count}"),
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }
}

/// Lay chips out several to a line
fn wrap_chips(items: &[String], color: Color) -> Vec<Line<'static>> {
    const PER_LINE: usize = 4;
    items
        .chunks(PER_LINE)
        .map(|chunk| {
            let mut spans = vec![Span::raw("  ")];
            for item in chunk {
                spans.push(Span::styled(format!("[{item}]"), Style::default().fg(color)));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect()
}

fn salary_k(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value}K"))
        .unwrap_or_else(|| "--".to_string())
}

/// Display width of a label, counting CJK characters as two cells
fn display_width(value: &str) -> usize {
    value
        .chars()
        .map(|c| if c.is_ascii() { 1 } else { 2 })
        .sum()
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(display_width).max().unwrap_or(0)
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(value));
    format!("{value}{}", " ".repeat(fill))
}

fn card(label: &str, value: String) -> Span<'static> {
    Span::styled(
        format!("{label} {value}"),
        Style::default()
            .fg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD),
    )
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn loading(tab: Tab) -> Line<'static> {
    Line::from(Span::styled(
        format!("{}...", loading_text(tab)),
        Style::default().fg(Color::Yellow),
    ))
}

fn error_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::LightRed),
    ))
}

fn muted(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}
