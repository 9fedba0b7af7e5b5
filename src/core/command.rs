//! Command parser for the : command system

use crate::domain::Tab;

/// Output format for `:export`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Crawl form
    Crawl {
        keyword: String,
        max_pages: Option<u32>,
    },
    Pages(u32),

    // Tabs
    Tab(Tab),
    Refresh,

    // Output
    Export(Option<ExportFormat>),
    Save(Option<String>),

    // Backend
    Ping,

    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        "crawl" | "c" => match args {
            Some(args) => parse_crawl_args(&args),
            None => Command::Unknown(input.to_string()),
        },
        "pages" | "p" => match args.and_then(|s| s.parse::<u32>().ok()) {
            Some(n) if n > 0 => Command::Pages(n),
            _ => Command::Unknown(input.to_string()),
        },

        "tab" => match args.and_then(|s| s.parse::<Tab>().ok()) {
            Some(tab) => Command::Tab(tab),
            None => Command::Unknown(input.to_string()),
        },
        "refresh" | "reload" | "r" => Command::Refresh,

        "export" | "e" => match args.as_deref().map(str::to_lowercase).as_deref() {
            None => Command::Export(None),
            Some("csv") => Command::Export(Some(ExportFormat::Csv)),
            Some("json") => Command::Export(Some(ExportFormat::Json)),
            Some(_) => Command::Unknown(input.to_string()),
        },
        "save" | "w" => Command::Save(args),

        "ping" | "health" | "status" => Command::Ping,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        other => match other.parse::<Tab>() {
            Ok(tab) if args.is_none() => Command::Tab(tab),
            _ => Command::Unknown(input.to_string()),
        },
    }
}

/// `crawl <keyword...> [pages]`: a trailing number is the page count as long
/// as something is left over for the keyword.
fn parse_crawl_args(args: &str) -> Command {
    if let Some((keyword, last)) = args.rsplit_once(' ') {
        if let Ok(pages) = last.trim().parse::<u32>() {
            if !keyword.trim().is_empty() {
                return Command::Crawl {
                    keyword: keyword.trim().to_string(),
                    max_pages: Some(pages),
                };
            }
        }
    }
    Command::Crawl {
        keyword: args.to_string(),
        max_pages: None,
    }
}
