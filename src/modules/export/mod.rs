//! Export Module
//!
//! Writes whatever the dashboard has loaded to disk.
//!
//! - 'e' key exports the active tab
//! - 岗位列表 → CSV (or JSON with `:export json`)
//! - 统计数据 / 详细分析 → JSON
//! - 词云图 → PNG ('w' key or `:save [path]`)
//! - Files land in `<data dir>/exports/` unless a path is given

mod csv_export;
mod json_export;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::App;
use crate::core::{Action, ExportFormat, NotifyLevel};
use crate::domain::Tab;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Generate a timestamped filename scoped to the keyword
fn generate_filename(prefix: &str, keyword: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!(
        "{}-{}-{}.{}",
        prefix,
        sanitize(keyword),
        timestamp,
        extension
    )
}

/// Keep letters and digits (any script); everything else becomes `_`
fn sanitize(keyword: &str) -> String {
    let cleaned: String = keyword
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// Export the active tab's loaded data
pub fn export_current_view(app: &App, format: Option<ExportFormat>) -> Action {
    let format = format.unwrap_or_else(|| app.export_format_for_active_tab());
    match (app.active_tab, format) {
        (Tab::Jobs, format) => export_jobs(app, format),
        (Tab::Statistics, ExportFormat::Json) => export_statistics(app),
        (Tab::Analysis, ExportFormat::Json) => export_analysis(app),
        (Tab::Wordcloud, _) => save_wordcloud(app, None),
        (tab, ExportFormat::Csv) => Action::Notify(
            format!("CSV export is only available for 岗位列表, not {}", tab.title()),
            NotifyLevel::Warn,
        ),
    }
}

fn export_jobs(app: &App, format: ExportFormat) -> Action {
    let Some(jobs) = app.loaded_jobs() else {
        return Action::Notify("No jobs to export".to_string(), NotifyLevel::Warn);
    };
    let keyword = app.session.keyword().unwrap_or_default();

    let (path, result) = match format {
        ExportFormat::Csv => {
            let filename = generate_filename("jobs", keyword, "csv");
            let path = app.export_dir.join(&filename);
            let result = prepare(&app.export_dir)
                .and_then(|_| csv_export::write_jobs(&path, &jobs.jobs));
            (path, result)
        }
        ExportFormat::Json => {
            let filename = generate_filename("jobs", keyword, "json");
            let path = app.export_dir.join(&filename);
            let result = prepare(&app.export_dir)
                .and_then(|_| json_export::write_json(&path, jobs))
                .map(|_| jobs.jobs.len());
            (path, result)
        }
    };

    match result {
        Ok(count) => {
            tracing::info!(path = %path.display(), count, "exported jobs");
            Action::Notify(
                format!("Exported {} jobs to {}", count, path.display()),
                NotifyLevel::Info,
            )
        }
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

fn export_statistics(app: &App) -> Action {
    let Some(stats) = app.loaded_statistics() else {
        return Action::Notify("No statistics to export".to_string(), NotifyLevel::Warn);
    };
    let keyword = app.session.keyword().unwrap_or_default();
    let path = app
        .export_dir
        .join(generate_filename("stats", keyword, "json"));

    match prepare(&app.export_dir).and_then(|_| json_export::write_json(&path, stats)) {
        Ok(()) => Action::Notify(
            format!("Exported statistics to {}", path.display()),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

fn export_analysis(app: &App) -> Action {
    let Some(analysis) = app.loaded_analysis() else {
        return Action::Notify("No analysis to export".to_string(), NotifyLevel::Warn);
    };
    let keyword = app.session.keyword().unwrap_or_default();
    let path = app
        .export_dir
        .join(generate_filename("analysis", keyword, "json"));

    match prepare(&app.export_dir).and_then(|_| json_export::write_json(&path, analysis)) {
        Ok(()) => Action::Notify(
            format!("Exported analysis to {}", path.display()),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

/// Save the loaded word cloud as PNG, to `path` or the export directory
pub fn save_wordcloud(app: &App, path: Option<PathBuf>) -> Action {
    let Some(image) = app.loaded_wordcloud() else {
        return Action::Notify("No word cloud loaded".to_string(), NotifyLevel::Warn);
    };

    let path = match path {
        Some(path) => path,
        None => {
            let keyword = app.session.keyword().unwrap_or_default();
            app.export_dir
                .join(generate_filename("wordcloud", keyword, "png"))
        }
    };

    let result = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(prepare)
        .unwrap_or(Ok(()))
        .and_then(|_| write_png(&path, &image.bytes));

    match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), "saved word cloud");
            Action::Notify(
                format!("Saved word cloud to {}", path.display()),
                NotifyLevel::Info,
            )
        }
        Err(e) => Action::Notify(format!("Save failed: {}", e), NotifyLevel::Error),
    }
}

/// PNG bytes are written unchanged; anything else is re-encoded
fn write_png(path: &Path, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    if bytes.starts_with(PNG_SIGNATURE) {
        fs::write(path, bytes)?;
    } else {
        let decoded = image::load_from_memory(bytes)?;
        decoded.save_with_format(path, image::ImageFormat::Png)?;
    }
    Ok(())
}

fn prepare(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create export directory: {}", e).into())
}
