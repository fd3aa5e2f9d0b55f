//! Recommender service client (gorse-compatible REST API).
//!
//! The recommender owns all ranking; this client only feeds it items and
//! engagement signals and reads back ordered item ids. Item ids on the wire
//! are plain UUID strings.

use reqwest::{Client, StatusCode};

use vireo_config::RecommenderConfig;
use vireo_model::{FeedbackKind, UserId, VideoId};

use crate::error::{CoreError, Result};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone, Debug)]
pub struct RecommenderClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct FeedbackRow<'a> {
    #[serde(rename = "FeedbackType")]
    feedback_type: &'a str,
    #[serde(rename = "UserId")]
    user_id: String,
    #[serde(rename = "ItemId")]
    item_id: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

#[derive(Debug, serde::Serialize)]
struct ItemRow {
    #[serde(rename = "ItemId")]
    item_id: String,
    #[serde(rename = "Categories")]
    categories: Vec<String>,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

impl RecommenderClient {
    pub fn new(config: &RecommenderConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Record an engagement signal for (user, video).
    pub async fn insert_feedback(
        &self,
        user: UserId,
        video: VideoId,
        kind: FeedbackKind,
    ) -> Result<()> {
        let rows = [FeedbackRow {
            feedback_type: kind.as_wire(),
            user_id: user.to_string(),
            item_id: video.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }];
        let request = self
            .client
            .post(format!("{}/api/feedback", self.base_url))
            .json(&rows);
        self.execute(request).await
    }

    /// Remove a previously recorded signal (e.g. un-liking a video).
    pub async fn delete_feedback(
        &self,
        user: UserId,
        video: VideoId,
        kind: FeedbackKind,
    ) -> Result<()> {
        let request = self.client.delete(format!(
            "{}/api/feedback/{}/{user}/{video}",
            self.base_url,
            kind.as_wire(),
        ));
        self.execute(request).await
    }

    /// Register a new video with its tag categories.
    pub async fn insert_video(&self, video: VideoId, categories: Vec<String>) -> Result<()> {
        let row = ItemRow {
            item_id: video.to_string(),
            categories,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let request = self
            .client
            .post(format!("{}/api/item", self.base_url))
            .json(&row);
        self.execute(request).await
    }

    pub async fn delete_video(&self, video: VideoId) -> Result<()> {
        let request = self
            .client
            .delete(format!("{}/api/item/{video}", self.base_url));
        self.execute(request).await
    }

    /// Personalized recommendations for a user: ordered video ids, best
    /// first. `offset` is the page start for cursor pagination.
    pub async fn recommend(&self, user: UserId, n: usize, offset: u64) -> Result<Vec<VideoId>> {
        let request = self
            .client
            .get(format!("{}/api/recommend/{user}", self.base_url))
            .query(&[("n", n.to_string()), ("offset", offset.to_string())]);
        let response = self.with_key(request).send().await?;
        let response = Self::check_status(response).await?;

        let raw: Vec<String> = response.json().await?;
        tracing::debug!(%user, n, offset, returned = raw.len(), "recommendations fetched");
        raw.iter()
            .map(|id| {
                VideoId::from_string(id)
                    .map_err(|_| CoreError::UpstreamFormat(format!("bad item id: {id}")))
            })
            .collect()
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = self.with_key(request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(response),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CoreError::UpstreamFormat(format!(
                    "recommender returned {status}: {body}"
                )))
            }
        }
    }
}
