//! Postgres persistence.
//!
//! Queries are runtime-checked (`sqlx::query` + manual row mapping) so the
//! crate builds without a live database. Each repository is a cheap handle
//! over the shared pool.

pub mod social;
pub mod users;
pub mod videos;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::{CoreError, Result};

pub use social::SocialRepository;
pub use users::{NewUser, UserRepository};
pub use videos::{NewVideo, VideoRepository};

#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| CoreError::Database(err.into()))
    }

    pub fn videos(&self) -> VideoRepository {
        VideoRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn social(&self) -> SocialRepository {
        SocialRepository::new(self.pool.clone())
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}
