//! HTTP client for the Vireo API.
//!
//! Two jobs: pull feed pages for the window controller and push view
//! feedback for the progress tracker. Feedback sends are fire-and-forget;
//! a lost signal degrades recommendations slightly and never interrupts
//! scrolling.

use std::sync::Arc;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, StatusCode};
use tokio::sync::RwLock;
use tracing::warn;

use vireo_model::{FeedCursor, FeedPage, VideoId};

use crate::progress::ViewEvent;

/// API client with bearer-session support.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_version: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            base_url,
            api_version: "v1".to_string(),
            token_store: Arc::new(RwLock::new(None)),
        }
    }

    /// Build a versioned API URL.
    pub fn build_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/api/{}/{}", self.base_url, self.api_version, path)
    }

    /// Set (or clear) the session token.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    async fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    /// Fetch one feed page. A cursor of `None` asks for the first page.
    pub async fn fetch_feed_page(
        &self,
        cursor: Option<&FeedCursor>,
        limit: usize,
    ) -> Result<FeedPage> {
        let mut request = self
            .client
            .get(self.build_url("feed"))
            .query(&[("limit", limit.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor.as_str())]);
        }
        let response = self.authorized(request).await.send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow::anyhow!("feed fetch failed with {status}: {body}"))
            }
        }
    }

    /// Report a view event for a video. Returns the transport error so the
    /// caller can decide whether it cares; most call sites go through
    /// [`ApiClient::spawn_view_feedback`] and don't.
    pub async fn send_view_feedback(&self, video: VideoId, event: ViewEvent) -> Result<()> {
        let stage = match event {
            ViewEvent::Started => "started",
            ViewEvent::Finished => "finished",
        };
        let request = self
            .client
            .post(self.build_url(&format!("videos/{video}/view/{stage}")));
        let response = self.authorized(request).await.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => Err(anyhow::anyhow!("view feedback rejected with {status}")),
        }
    }

    /// Fire-and-forget feedback emission on the ambient runtime.
    pub fn spawn_view_feedback(&self, video: VideoId, event: ViewEvent) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(err) = client.send_view_feedback(video, event).await {
                warn!(video = %video, ?event, error = %err, "dropping view feedback");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_versioned_and_slash_tolerant() {
        let client = ApiClient::new("https://vireo.example.com".to_string());
        assert_eq!(
            client.build_url("/feed"),
            "https://vireo.example.com/api/v1/feed"
        );
        assert_eq!(
            client.build_url("videos/abc/view/started"),
            "https://vireo.example.com/api/v1/videos/abc/view/started"
        );
    }
}
