//! Opaque-token session resolution.
//!
//! Sessions are provisioned by the identity service; this store only answers
//! "which user does this bearer token belong to". Tokens live in Redis under
//! `session:{token}` with the user UUID as the value, expiry managed by the
//! writer.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use vireo_model::UserId;

use crate::error::Result;

#[derive(Clone)]
pub struct SessionStore {
    connection: ConnectionManager,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        Ok(Self { connection })
    }

    /// Resolve a bearer token to a user id, or `None` for unknown/expired
    /// tokens. Malformed stored values are treated as unknown tokens rather
    /// than surfaced: a corrupt session should read as "not logged in".
    pub async fn resolve(&self, token: &str) -> Result<Option<UserId>> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.get(Self::key(token)).await?;
        Ok(value
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .map(UserId))
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_namespacing() {
        assert_eq!(SessionStore::key("abc123"), "session:abc123");
    }
}
