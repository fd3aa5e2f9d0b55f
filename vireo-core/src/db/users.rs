use std::collections::HashMap;

use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use vireo_model::user::User;
use vireo_model::{UserId, UserPublic};

use crate::db::is_unique_violation;
use crate::error::{CoreError, Result};

/// Insert payload for registration. The password is already hashed by the
/// time it reaches the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user: &NewUser) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, bio, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CoreError::Conflict("email already registered".to_string())
            } else {
                err.into()
            }
        })?;
        Ok(())
    }

    pub async fn fetch(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, bio, avatar_url FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| decode_user(&row)).transpose()
    }

    /// Update profile fields. An absent avatar leaves the stored value
    /// untouched rather than clearing it.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: &str,
        bio: &str,
        avatar_url: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, bio = $3, avatar_url = COALESCE($4, avatar_url)
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(name)
        .bind(bio)
        .bind(avatar_url)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hydrate public profiles, preserving the caller's id order.
    pub async fn fetch_public_many(&self, ids: &[UserId]) -> Result<Vec<UserPublic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<uuid::Uuid> = ids.iter().map(UserId::to_uuid).collect();
        let rows = sqlx::query("SELECT id, name, avatar_url FROM users WHERE id = ANY($1)")
            .bind(&uuids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_id: HashMap<UserId, UserPublic> = rows
            .iter()
            .map(|row| {
                let user = UserPublic {
                    id: UserId(row.try_get("id")?),
                    name: row.try_get("name")?,
                    avatar_url: row.try_get("avatar_url")?,
                };
                Ok::<_, CoreError>((user.id, user))
            })
            .collect::<Result<_>>()?;
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

fn decode_user(row: &PgRow) -> Result<User> {
    Ok(User {
        id: UserId(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        bio: row.try_get("bio")?,
        avatar_url: row.try_get("avatar_url")?,
    })
}
