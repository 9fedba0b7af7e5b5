//! Domain models for the job crawl dashboard
//!
//! These types mirror the backend responses and carry no behaviour beyond
//! the "is there anything to show" checks the dashboard needs.

mod models;
mod tab;
mod wordcloud;

pub use models::{
    AnalysisView, AreaCount, BackendStatus, CrawlRequest, CrawlResult, EducationCount,
    ExperienceCount, JobListView, JobPosting, KeywordWeight, SalaryBucket, SalaryRange,
    SalaryStats, SkillDemand, StatisticsView,
};
pub use tab::{ParseTabError, Tab};
pub use wordcloud::{WordcloudError, WordcloudImage};
