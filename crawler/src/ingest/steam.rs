use super::ReviewSource;
use crate::model::{RawReview, ReviewPage};
use async_trait::async_trait;
use crawler_core::config::FetchConfig;
use crawler_core::{Error, Result, RetryPolicy};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query_summary: Option<QuerySummary>,
    #[serde(default)]
    reviews: Vec<RawReview>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct QuerySummary {
    #[serde(default)]
    total_reviews: Option<u64>,
}

/// The fixed query parameter set sent with every page request.
///
/// `filter=recent` orders by creation time and disables the API's own
/// time-windowing, so the full history is reachable through the cursor.
/// Language and purchase-type are left unrestricted so the reported
/// `total_reviews` matches what pagination will actually yield.
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub app_id: u64,
    pub page_size: u32,
}

impl RequestParams {
    fn query(&self, cursor: &str) -> Vec<(&'static str, String)> {
        vec![
            ("json", "1".to_string()),
            ("filter", "recent".to_string()),
            ("day_range", i64::MAX.to_string()),
            ("language", "all".to_string()),
            ("review_type", "all".to_string()),
            ("purchase_type", "all".to_string()),
            ("filter_offtopic_activity", "0".to_string()),
            ("num_per_page", self.page_size.to_string()),
            ("cursor", cursor.to_string()),
        ]
    }
}

pub struct SteamSource {
    client: reqwest::Client,
    base_url: String,
    params: RequestParams,
    retry: RetryPolicy,
}

impl SteamSource {
    pub fn new(fetch: &FetchConfig, app_id: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(fetch.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: fetch.base_url.trim_end_matches('/').to_string(),
            params: RequestParams {
                app_id,
                page_size: fetch.page_size,
            },
            retry: RetryPolicy::from_config(fetch),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/appreviews/{}", self.base_url, self.params.app_id)
    }

    async fn request_page(&self, cursor: &str) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&self.params.query(cursor))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ReviewSource for SteamSource {
    #[instrument(skip(self))]
    async fn fetch_page(&self, cursor: &str) -> Result<ReviewPage> {
        let body = self
            .retry
            .run("fetch_reviews_page", || self.request_page(cursor))
            .await?;

        let parsed: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(format!("response body is not valid JSON: {e}")))?;

        let next_cursor = parsed
            .cursor
            .ok_or_else(|| Error::malformed("response is missing the continuation cursor"))?;

        debug!(
            reviews = parsed.reviews.len(),
            total = ?parsed.query_summary.as_ref().and_then(|s| s.total_reviews),
            "Fetched review page"
        );

        Ok(ReviewPage {
            reviews: parsed.reviews,
            cursor: next_cursor,
            total: parsed.query_summary.and_then(|s| s.total_reviews),
        })
    }

    fn source_id(&self) -> &str {
        "steam"
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .get(self.endpoint())
            .query(&[("json", "1"), ("num_per_page", "1")])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
