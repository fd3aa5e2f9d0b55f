use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Public user projection, safe to embed in any response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Full user row, server-side only. The password hash never leaves the
/// repository layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}
