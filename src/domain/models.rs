//! Backend view-models
//!
//! Every field the backend may omit carries `#[serde(default)]` so that a
//! partial payload (e.g. `{"total_jobs": 0, "message": "暂无数据"}`) still
//! decodes into something the dashboard can render.

use serde::{Deserialize, Serialize};

/// Body of `POST /crawl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub keyword: String,
    pub max_pages: u32,
}

/// Response of `POST /crawl`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub job_ids: Option<Vec<i64>>,
}

/// Response of `GET /stats/{keyword}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsView {
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub company_count: u64,
    #[serde(default, rename = "salary_statistics")]
    pub salary_stats: Option<SalaryStats>,
    #[serde(default)]
    pub area_distribution: Vec<AreaCount>,
    #[serde(default)]
    pub experience_distribution: Vec<ExperienceCount>,
    #[serde(default)]
    pub education_distribution: Vec<EducationCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatisticsView {
    pub fn is_empty(&self) -> bool {
        self.total_jobs == 0
    }

    /// Salary stats worth showing as cards (the backend reports `avg: 0` when
    /// no salary could be parsed)
    pub fn salary_cards(&self) -> Option<&SalaryStats> {
        self.salary_stats.as_ref().filter(|stats| stats.avg > 0.0)
    }

    pub fn salary_distribution(&self) -> &[SalaryBucket] {
        self.salary_stats
            .as_ref()
            .and_then(|stats| stats.distribution.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    #[serde(default)]
    pub avg: f64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub distribution: Option<Vec<SalaryBucket>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryBucket {
    pub range: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaCount {
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub count: u64,
}

impl AreaCount {
    pub fn display_area(&self) -> &str {
        or_unknown(self.area.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceCount {
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationCount {
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub count: u64,
}

impl ExperienceCount {
    pub fn display_experience(&self) -> &str {
        or_unknown(self.experience.as_deref())
    }
}

impl EducationCount {
    pub fn display_education(&self) -> &str {
        or_unknown(self.education.as_deref())
    }
}

/// Response of `GET /analysis/{keyword}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisView {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub total_jobs: Option<u64>,
    #[serde(default)]
    pub analysis_time: Option<String>,
    #[serde(default)]
    pub top_keywords: Vec<KeywordWeight>,
    #[serde(default)]
    pub required_skills: Vec<SkillDemand>,
    #[serde(default)]
    pub salary_range_analysis: Option<SalaryRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalysisView {
    /// The backend answers `{"message": "暂无数据"}` without `total_jobs`
    /// when nothing was crawled for the keyword.
    pub fn is_empty(&self) -> bool {
        self.total_jobs.unwrap_or(0) == 0
    }

    pub fn display_time(&self) -> &str {
        self.analysis_time
            .as_deref()
            .filter(|time| !time.trim().is_empty())
            .unwrap_or("未知")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub word: String,
    #[serde(default)]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDemand {
    pub skill: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub demand_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
}

/// Response of `GET /jobs/{keyword}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListView {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
}

impl JobListView {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl_time: Option<String>,
}

impl JobPosting {
    pub fn display_title(&self) -> &str {
        non_blank(self.title.as_deref()).unwrap_or("未知岗位")
    }

    pub fn display_company(&self) -> &str {
        non_blank(self.company.as_deref()).unwrap_or("未知公司")
    }

    pub fn salary(&self) -> Option<&str> {
        non_blank(self.salary.as_deref())
    }

    pub fn area(&self) -> Option<&str> {
        non_blank(self.area.as_deref())
    }

    pub fn experience(&self) -> Option<&str> {
        non_blank(self.experience.as_deref())
    }

    pub fn education(&self) -> Option<&str> {
        non_blank(self.education.as_deref())
    }

    /// Description cut to `max_chars` characters, with `...` appended when cut
    pub fn description_excerpt(&self, max_chars: usize) -> Option<String> {
        let description = non_blank(self.description.as_deref())?;
        if description.chars().count() <= max_chars {
            return Some(description.to_string());
        }
        let cut: String = description.chars().take(max_chars).collect();
        Some(format!("{cut}..."))
    }
}

/// Response of the backend root (`GET /`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Grouping key as shown in a distribution block; null and blank keys read "未知"
fn or_unknown(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or("未知")
}
