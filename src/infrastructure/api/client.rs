//! Backend client trait and its reqwest implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use super::{ApiError, Endpoints};
use crate::domain::{
    AnalysisView, BackendStatus, CrawlRequest, CrawlResult, JobListView, StatisticsView,
};

/// Raw image response
#[derive(Debug, Clone)]
pub struct ImageBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Operations the dashboard needs from the backend
#[async_trait]
pub trait DashboardApi: Send + Sync + 'static {
    /// Trigger a crawl job and wait for it to finish
    async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlResult, ApiError>;

    async fn statistics(&self, keyword: &str) -> Result<StatisticsView, ApiError>;

    async fn analysis(&self, keyword: &str) -> Result<AnalysisView, ApiError>;

    async fn jobs(&self, keyword: &str) -> Result<JobListView, ApiError>;

    /// Download an image by absolute URL (the word-cloud URL already carries
    /// its cache-bust token)
    async fn image(&self, url: &str) -> Result<ImageBody, ApiError>;

    async fn status(&self) -> Result<BackendStatus, ApiError>;
}

/// reqwest-backed client
pub struct HttpApi {
    http: reqwest::Client,
    endpoints: Endpoints,
    crawl_timeout: Duration,
}

impl HttpApi {
    pub fn new(
        endpoints: Endpoints,
        request_timeout: Duration,
        crawl_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("jobscope/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoints,
            crawl_timeout,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(ApiError::from_status(status, &body));
    }
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlResult, ApiError> {
        let url = self.endpoints.crawl();
        tracing::info!(%url, keyword = %request.keyword, max_pages = request.max_pages, "POST crawl");

        // Crawls run far longer than the default request timeout
        let response = self
            .http
            .post(&url)
            .timeout(self.crawl_timeout)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ApiError::Timeout(self.crawl_timeout)
                } else {
                    ApiError::Transport(err)
                }
            })?;
        decode_json(response).await
    }

    async fn statistics(&self, keyword: &str) -> Result<StatisticsView, ApiError> {
        self.get_json(&self.endpoints.statistics(keyword)).await
    }

    async fn analysis(&self, keyword: &str) -> Result<AnalysisView, ApiError> {
        self.get_json(&self.endpoints.analysis(keyword)).await
    }

    async fn jobs(&self, keyword: &str) -> Result<JobListView, ApiError> {
        self.get_json(&self.endpoints.jobs(keyword)).await
    }

    async fn image(&self, url: &str) -> Result<ImageBody, ApiError> {
        tracing::debug!(%url, "GET image");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &bytes));
        }
        Ok(ImageBody {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    async fn status(&self) -> Result<BackendStatus, ApiError> {
        self.get_json(&self.endpoints.root()).await
    }
}
