//! URL construction for the backend API

use reqwest::Url;

use super::ApiError;

/// Fixed page size for the job list
pub const JOBS_LIMIT: u32 = 100;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Backend URLs rooted at the configured API base (e.g. `http://localhost:8000/api`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let trimmed = base.trim().trim_end_matches('/');
        let parsed =
            Url::parse(trimmed).map_err(|_| ApiError::InvalidBaseUrl(base.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ApiError::InvalidBaseUrl(base.to_string()));
        }
        Ok(Self {
            base: trimmed.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn crawl(&self) -> String {
        format!("{}/crawl", self.base)
    }

    pub fn statistics(&self, keyword: &str) -> String {
        format!("{}/stats/{}", self.base, urlencoding::encode(keyword))
    }

    pub fn analysis(&self, keyword: &str) -> String {
        format!("{}/analysis/{}", self.base, urlencoding::encode(keyword))
    }

    pub fn jobs(&self, keyword: &str) -> String {
        format!(
            "{}/jobs/{}?limit={}",
            self.base,
            urlencoding::encode(keyword),
            JOBS_LIMIT
        )
    }

    pub fn wordcloud(&self, keyword: &str, token: u64) -> String {
        format!(
            "{}/wordcloud/{}?t={}",
            self.base,
            urlencoding::encode(keyword),
            token
        )
    }

    /// Server root, where the backend reports its status
    pub fn root(&self) -> String {
        Url::parse(&self.base)
            .and_then(|url| url.join("/"))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("{}/", self.base))
    }
}

/// Source of cache-bust tokens: wall-clock milliseconds, bumped so that two
/// requests in the same millisecond still get distinct tokens.
#[derive(Debug, Default, Clone)]
pub struct CacheBuster {
    last: u64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_token(&mut self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.next_token_at(now)
    }

    pub fn next_token_at(&mut self, now_ms: u64) -> u64 {
        let token = now_ms.max(self.last.saturating_add(1));
        self.last = token;
        token
    }
}
