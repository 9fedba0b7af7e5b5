//! Dashboard tabs

use std::fmt;
use std::str::FromStr;

/// The four mutually exclusive dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tab {
    Statistics,
    Analysis,
    Wordcloud,
    Jobs,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Statistics, Tab::Analysis, Tab::Wordcloud, Tab::Jobs];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Statistics => "统计数据",
            Tab::Analysis => "详细分析",
            Tab::Wordcloud => "词云图",
            Tab::Jobs => "岗位列表",
        }
    }

    /// Stable identifier used by the command line and the logs
    pub fn slug(&self) -> &'static str {
        match self {
            Tab::Statistics => "statistics",
            Tab::Analysis => "analysis",
            Tab::Wordcloud => "wordcloud",
            Tab::Jobs => "jobs",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Tab::Statistics => '1',
            Tab::Analysis => '2',
            Tab::Wordcloud => '3',
            Tab::Jobs => '4',
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Statistics => 0,
            Tab::Analysis => 1,
            Tab::Wordcloud => 2,
            Tab::Jobs => 3,
        }
    }

    pub fn from_shortcut(c: char) -> Option<Tab> {
        Tab::ALL.into_iter().find(|tab| tab.shortcut() == c)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tab `{0}` (expected statistics, analysis, wordcloud or jobs)")]
pub struct ParseTabError(pub String);

impl FromStr for Tab {
    type Err = ParseTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "statistics" | "stats" | "stat" => Ok(Tab::Statistics),
            "analysis" | "ana" => Ok(Tab::Analysis),
            "wordcloud" | "cloud" | "wc" => Ok(Tab::Wordcloud),
            "jobs" | "job" | "list" => Ok(Tab::Jobs),
            other => Err(ParseTabError(other.to_string())),
        }
    }
}
