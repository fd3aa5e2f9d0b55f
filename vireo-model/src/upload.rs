use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Upload classes with distinct object-key prefixes.
///
/// The prefix is enforced server-side in the signed policy, so a client
/// holding a `video` ticket cannot write outside `video/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadCategory {
    Avatar,
    Video,
    Cover,
}

impl UploadCategory {
    pub fn prefix(&self) -> &'static str {
        match self {
            UploadCategory::Avatar => "avatar",
            UploadCategory::Video => "video",
            UploadCategory::Cover => "cover",
        }
    }
}

impl std::str::FromStr for UploadCategory {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "avatar" => Ok(UploadCategory::Avatar),
            "video" => Ok(UploadCategory::Video),
            "cover" => Ok(UploadCategory::Cover),
            other => Err(ModelError::UnknownUploadCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Signed POST-policy credentials for one direct-to-storage upload.
///
/// Valid for one hour; the storage endpoint checks the policy conditions
/// (size cap, key prefix) against the multipart form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTicket {
    pub access_key_id: String,
    pub policy: String,
    pub signature: String,
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_its_own_prefix() {
        for category in [
            UploadCategory::Avatar,
            UploadCategory::Video,
            UploadCategory::Cover,
        ] {
            assert_eq!(category.prefix().parse::<UploadCategory>().unwrap(), category);
        }
        assert!("thumbnail".parse::<UploadCategory>().is_err());
    }
}
