use vireo_config::Config;
use vireo_core::{Database, RecommenderClient, SearchClient, SessionStore, UploadSigner};

use crate::errors::AppResult;

/// Shared handles for request handlers. Everything here is a cheap clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub recommender: RecommenderClient,
    pub search: SearchClient,
    pub uploads: UploadSigner,
}

impl AppState {
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let db = Database::connect(&config.database.url).await?;
        let sessions = SessionStore::connect(&config.redis.url).await?;
        Ok(Self {
            db,
            sessions,
            recommender: RecommenderClient::new(&config.recommender),
            search: SearchClient::new(&config.search),
            uploads: UploadSigner::new(&config.storage),
        })
    }
}
