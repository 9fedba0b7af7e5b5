//! Session state shared by every fetch
//!
//! The keyword the operator last submitted lives here rather than as ambient
//! state; the controller hands a `&SearchContext` to each dispatch.

/// Fallback when the operator gives no (or a zero) page count
pub const DEFAULT_MAX_PAGES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("请输入岗位关键词")]
    EmptyKeyword,
    #[error("爬取进行中，请稍候")]
    CrawlInFlight,
}

/// Keyword and page budget of the last accepted crawl submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    pub keyword: String,
    pub max_pages: u32,
}

impl SearchContext {
    /// Validate form input. The keyword is trimmed; a missing or zero page
    /// count falls back to `default_pages`. Any other count is sent as typed.
    pub fn new(
        keyword: &str,
        max_pages: Option<u32>,
        default_pages: u32,
    ) -> Result<Self, ValidationError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }
        let max_pages = max_pages
            .filter(|pages| *pages > 0)
            .unwrap_or(default_pages);
        Ok(Self {
            keyword: keyword.to_string(),
            max_pages,
        })
    }
}

/// Process-wide dashboard session
#[derive(Debug, Clone)]
pub struct Session {
    search: Option<SearchContext>,
    /// Page count used by the form when none is typed
    pub default_max_pages: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES)
    }
}

impl Session {
    pub fn new(default_max_pages: u32) -> Self {
        Self {
            search: None,
            default_max_pages: default_max_pages.max(1),
        }
    }

    pub fn search(&self) -> Option<&SearchContext> {
        self.search.as_ref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.search.as_ref().map(|search| search.keyword.as_str())
    }

    /// Replace the current search wholesale
    pub fn begin(&mut self, search: SearchContext) {
        self.search = Some(search);
    }

    pub fn set_default_pages(&mut self, pages: u32) -> u32 {
        self.default_max_pages = pages.max(1);
        self.default_max_pages
    }

    pub fn adjust_default_pages(&mut self, delta: i32) -> u32 {
        let next = (self.default_max_pages as i64 + delta as i64).clamp(1, u32::MAX as i64) as u32;
        self.default_max_pages = next;
        next
    }
}
