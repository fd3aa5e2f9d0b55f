//! Search index client.
//!
//! Thin wrapper over an Elasticsearch-compatible HTTP API. The index owns
//! ranking; we only index documents and read back ordered ids, hydrating
//! full rows from Postgres afterwards.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};

use vireo_config::SearchConfig;
use vireo_model::{UserId, VideoId};

use crate::error::{CoreError, Result};

const VIDEO_INDEX: &str = "videos";
const USER_INDEX: &str = "users";

#[derive(Clone, Debug)]
pub struct SearchClient {
    client: Client,
    base_url: String,
}

/// Searchable projection of a video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDoc {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Searchable projection of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserDoc {
    pub name: String,
    pub bio: String,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    pub async fn index_video(&self, id: VideoId, doc: &VideoDoc) -> Result<()> {
        self.put_doc(VIDEO_INDEX, &id.to_string(), doc).await
    }

    pub async fn delete_video(&self, id: VideoId) -> Result<()> {
        self.delete_doc(VIDEO_INDEX, &id.to_string()).await
    }

    pub async fn index_user(&self, id: UserId, doc: &UserDoc) -> Result<()> {
        self.put_doc(USER_INDEX, &id.to_string(), doc).await
    }

    /// Full-text search over videos; returns ids in relevance order.
    pub async fn search_videos(&self, query: &str, limit: usize) -> Result<Vec<VideoId>> {
        let hits = self
            .search(
                VIDEO_INDEX,
                json!({
                    "size": limit,
                    "query": {
                        "multi_match": {
                            "query": query,
                            "fields": ["title^2", "description", "tags"],
                        }
                    }
                }),
            )
            .await?;
        hits.iter()
            .map(|id| {
                VideoId::from_string(id)
                    .map_err(|_| CoreError::UpstreamFormat(format!("bad video hit id: {id}")))
            })
            .collect()
    }

    /// Full-text search over users; returns ids in relevance order.
    pub async fn search_users(&self, query: &str, limit: usize) -> Result<Vec<UserId>> {
        let hits = self
            .search(
                USER_INDEX,
                json!({
                    "size": limit,
                    "query": {
                        "multi_match": {
                            "query": query,
                            "fields": ["name^2", "bio"],
                        }
                    }
                }),
            )
            .await?;
        hits.iter()
            .map(|id| {
                id.parse()
                    .map(UserId)
                    .map_err(|_| CoreError::UpstreamFormat(format!("bad user hit id: {id}")))
            })
            .collect()
    }

    async fn put_doc<D: Serialize>(&self, index: &str, id: &str, doc: &D) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/{index}/_doc/{id}", self.base_url))
            .json(doc)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn delete_doc(&self, index: &str, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/{index}/_doc/{id}", self.base_url))
            .send()
            .await?;
        // Deleting an unindexed document is not an error worth surfacing.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check_status(response).await.map(|_| ())
    }

    async fn search(&self, index: &str, body: Value) -> Result<Vec<String>> {
        let response = self
            .client
            .post(format!("{}/{index}/_search", self.base_url))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let payload: Value = response.json().await?;
        let hits = payload["hits"]["hits"]
            .as_array()
            .ok_or_else(|| CoreError::UpstreamFormat("missing hits array".to_string()))?;
        tracing::debug!(index, hits = hits.len(), "search executed");
        hits.iter()
            .map(|hit| {
                hit["_id"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| CoreError::UpstreamFormat("hit without _id".to_string()))
            })
            .collect()
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(CoreError::UpstreamFormat(format!(
                "search index returned {status}: {body}"
            )))
        }
    }
}
