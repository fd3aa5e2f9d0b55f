use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::video::VideoDetailed;

/// One page of the recommendation feed.
///
/// `next_cursor` of `None` means the feed is exhausted; clients stop
/// paginating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub videos: Vec<VideoDetailed>,
    pub next_cursor: Option<FeedCursor>,
}

/// Opaque pagination token for the recommendation feed.
///
/// Clients treat the token as a black box: it is obtained from the most
/// recent page response and spent on the next fetch. Server-side it encodes
/// the recommender offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedCursor(String);

impl FeedCursor {
    const PREFIX: &'static str = "v1:";

    pub fn from_offset(offset: u64) -> Self {
        let raw = format!("{}{offset}", Self::PREFIX);
        FeedCursor(URL_SAFE_NO_PAD.encode(raw))
    }

    pub fn offset(&self) -> Result<u64, ModelError> {
        let decoded = URL_SAFE_NO_PAD
            .decode(&self.0)
            .map_err(|_| ModelError::InvalidCursor)?;
        let raw = String::from_utf8(decoded).map_err(|_| ModelError::InvalidCursor)?;
        let rest = raw
            .strip_prefix(Self::PREFIX)
            .ok_or(ModelError::InvalidCursor)?;
        rest.parse().map_err(|_| ModelError::InvalidCursor)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FeedCursor {
    fn from(token: String) -> Self {
        FeedCursor(token)
    }
}

impl std::fmt::Display for FeedCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_round_trips_offset() {
        for offset in [0, 1, 5, 10_000] {
            let cursor = FeedCursor::from_offset(offset);
            assert_eq!(cursor.offset().unwrap(), offset);
        }
    }

    #[test]
    fn cursor_is_opaque_not_plaintext() {
        let cursor = FeedCursor::from_offset(15);
        assert!(!cursor.as_str().contains("15"));
    }

    #[test]
    fn tampered_cursor_is_rejected() {
        let cursor = FeedCursor::from(String::from("!!not-base64!!"));
        assert!(cursor.offset().is_err());

        // Valid base64, wrong payload shape
        let bogus = FeedCursor::from(URL_SAFE_NO_PAD.encode("v2:zzz"));
        assert!(bogus.offset().is_err());
    }
}
