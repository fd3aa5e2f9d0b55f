//! Object-storage upload signing.
//!
//! Uploads never pass through the API server: clients receive a signed
//! POST-policy ticket and send the multipart form straight to the storage
//! endpoint. The policy limits what the ticket can do: a one-hour
//! expiry, a 1 GiB size cap, and an object key locked to the category
//! prefix.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use vireo_config::StorageConfig;
use vireo_model::{UploadCategory, UploadTicket};

/// Tickets are valid for one hour from issue.
pub const TICKET_VALIDITY_SECS: i64 = 3600;

/// Hard cap on a single upload: 1 GiB.
pub const MAX_UPLOAD_BYTES: u64 = 1 << 30;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct UploadSigner {
    access_key_id: String,
    access_key_secret: String,
    pub upload_url: String,
    pub public_base_url: String,
}

impl UploadSigner {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config.access_key_secret.clone(),
            upload_url: config.upload_url.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Mint a ticket for one upload in the given category.
    pub fn issue(&self, category: UploadCategory) -> UploadTicket {
        self.issue_at(category, Utc::now())
    }

    /// Deterministic variant: the caller supplies the issue time and the
    /// object key is derived from it (UUIDv7 keys sort by time, matching how
    /// the bucket is laid out).
    pub fn issue_at(&self, category: UploadCategory, now: DateTime<Utc>) -> UploadTicket {
        let key = format!("{}/{}", category.prefix(), Uuid::now_v7());
        let policy = self.encode_policy(category, now + Duration::seconds(TICKET_VALIDITY_SECS));
        let signature = self.sign(&policy);
        UploadTicket {
            access_key_id: self.access_key_id.clone(),
            policy,
            signature,
            key,
        }
    }

    /// Public URL an uploaded object will be served from.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn encode_policy(&self, category: UploadCategory, expiration: DateTime<Utc>) -> String {
        let policy = serde_json::json!({
            "expiration": expiration.to_rfc3339_opts(SecondsFormat::Millis, true),
            "conditions": [
                ["content-length-range", 0, MAX_UPLOAD_BYTES],
                ["starts-with", "$key", category.prefix()],
            ],
        });
        STANDARD.encode(policy.to_string())
    }

    fn sign(&self, encoded_policy: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.access_key_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(encoded_policy.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> UploadSigner {
        UploadSigner {
            access_key_id: "AKID".into(),
            access_key_secret: "secret".into(),
            upload_url: "https://media.example.com/upload".into(),
            public_base_url: "https://cdn.example.com".into(),
        }
    }

    fn decode_policy(ticket: &UploadTicket) -> serde_json::Value {
        let raw = STANDARD.decode(&ticket.policy).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    #[test]
    fn policy_carries_expiry_size_cap_and_prefix() {
        let issued = "2026-03-01T12:00:00Z".parse().unwrap();
        let ticket = signer().issue_at(UploadCategory::Video, issued);
        let policy = decode_policy(&ticket);

        assert_eq!(policy["expiration"], "2026-03-01T13:00:00.000Z");
        assert_eq!(policy["conditions"][0][2], MAX_UPLOAD_BYTES);
        assert_eq!(policy["conditions"][1][2], "video");
        assert!(ticket.key.starts_with("video/"));
    }

    #[test]
    fn signature_is_deterministic_for_a_policy() {
        let s = signer();
        let issued = "2026-03-01T12:00:00Z".parse().unwrap();
        let a = s.issue_at(UploadCategory::Cover, issued);
        let b = s.issue_at(UploadCategory::Cover, issued);
        // Same policy bytes, same signature; keys differ per ticket.
        assert_eq!(a.policy, b.policy);
        assert_eq!(a.signature, b.signature);
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn public_url_joins_key() {
        assert_eq!(
            signer().public_url("cover/xyz"),
            "https://cdn.example.com/cover/xyz"
        );
    }
}
