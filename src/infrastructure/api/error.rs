use std::time::Duration;

use reqwest::StatusCode;

/// Errors from talking to the backend. All of them end up rendered as a
/// placeholder or status message; none are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API base URL `{0}`")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl ApiError {
    /// Build a status error, preferring the FastAPI `{"detail": ...}` body
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            detail: serde_json::Value,
        }

        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .map(|body| match body.detail {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            })
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });

        ApiError::Status { status, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_detail_body() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"统计失败: boom"}"#.as_bytes(),
        );
        assert_eq!(err.to_string(), "HTTP 500 Internal Server Error: 统计失败: boom");
    }

    #[test]
    fn test_status_falls_back_to_reason() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, b"<html>nope</html>");
        assert_eq!(err.to_string(), "HTTP 404 Not Found: Not Found");
    }

    #[test]
    fn test_timeout_message() {
        let err = ApiError::Timeout(Duration::from_secs(600));
        assert_eq!(err.to_string(), "timed out after 600s");
    }
}
