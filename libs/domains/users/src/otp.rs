//! Ephemeral, expiring OTP records keyed by user id.
//!
//! The store is process-memory only: a restart invalidates every
//! outstanding OTP, which the signup flow accepts. Expiry is evaluated
//! lazily at verification time; no background sweep runs.

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Default OTP validity window.
pub const DEFAULT_OTP_TTL: std::time::Duration = std::time::Duration::from_secs(60);

/// Inclusive range for generated codes (4 digits).
const OTP_MIN: u32 = 1000;
const OTP_MAX: u32 = 9999;

#[derive(Debug, Clone)]
struct OtpEntry {
    code: u32,
    expires_at: DateTime<Utc>,
}

/// Concurrency-safe keyed OTP store.
///
/// Sending an OTP upserts the record for that user (the latest code
/// supersedes prior ones). Verification is a single atomic
/// check-expire-and-delete under the write lock, so one code can never
/// be spent twice by concurrent verify attempts.
#[derive(Debug, Clone)]
pub struct OtpStore {
    entries: Arc<RwLock<HashMap<Uuid, OtpEntry>>>,
    ttl: Duration,
}

impl OtpStore {
    /// Create a store with the default 60 second validity window.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_OTP_TTL)
    }

    /// Create a store with a custom validity window.
    pub fn with_ttl(ttl: std::time::Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(60)),
        }
    }

    /// The configured validity window.
    pub fn ttl(&self) -> std::time::Duration {
        self.ttl.to_std().unwrap_or(DEFAULT_OTP_TTL)
    }

    /// Generate a fresh 4-digit code for the user, replacing any prior
    /// record, and return it for delivery.
    pub async fn issue(&self, user_id: Uuid) -> u32 {
        let code = rand::rng().random_range(OTP_MIN..=OTP_MAX);
        let entry = OtpEntry {
            code,
            expires_at: Utc::now() + self.ttl,
        };

        let mut entries = self.entries.write().await;
        entries.insert(user_id, entry);

        tracing::debug!(user_id = %user_id, "Issued OTP");
        code
    }

    /// Atomically check, expire and consume the OTP for a user.
    ///
    /// - no record: `OtpNotFound`
    /// - expired: record deleted, `OtpExpired`
    /// - wrong code: record retained (retry allowed until expiry), `OtpInvalid`
    /// - match: record deleted (single use), `Ok`
    pub async fn verify_and_consume(&self, user_id: Uuid, code: u32) -> UserResult<()> {
        let mut entries = self.entries.write().await;

        let entry = entries.get(&user_id).ok_or(UserError::OtpNotFound)?;

        if Utc::now() > entry.expires_at {
            entries.remove(&user_id);
            return Err(UserError::OtpExpired);
        }

        if entry.code != code {
            return Err(UserError::OtpInvalid);
        }

        entries.remove(&user_id);
        Ok(())
    }

    /// Whether a record currently exists for the user (expired or not).
    pub async fn contains(&self, user_id: Uuid) -> bool {
        self.entries.read().await.contains_key(&user_id)
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_then_verify_consumes_the_code() {
        let store = OtpStore::new();
        let user_id = Uuid::now_v7();

        let code = store.issue(user_id).await;
        assert!((OTP_MIN..=OTP_MAX).contains(&code));

        store.verify_and_consume(user_id, code).await.unwrap();

        // Single use: the same code is gone
        let result = store.verify_and_consume(user_id, code).await;
        assert!(matches!(result, Err(UserError::OtpNotFound)));
    }

    #[tokio::test]
    async fn test_verify_without_issue_is_not_found() {
        let store = OtpStore::new();

        let result = store.verify_and_consume(Uuid::now_v7(), 1234).await;
        assert!(matches!(result, Err(UserError::OtpNotFound)));
    }

    #[tokio::test]
    async fn test_wrong_code_keeps_the_record_for_retry() {
        let store = OtpStore::new();
        let user_id = Uuid::now_v7();

        let code = store.issue(user_id).await;
        let wrong = if code == OTP_MAX { OTP_MIN } else { code + 1 };

        let result = store.verify_and_consume(user_id, wrong).await;
        assert!(matches!(result, Err(UserError::OtpInvalid)));
        assert!(store.contains(user_id).await);

        // Correct retry still succeeds
        store.verify_and_consume(user_id, code).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_code_is_removed_as_a_side_effect() {
        let store = OtpStore::with_ttl(std::time::Duration::ZERO);
        let user_id = Uuid::now_v7();

        let code = store.issue(user_id).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let result = store.verify_and_consume(user_id, code).await;
        assert!(matches!(result, Err(UserError::OtpExpired)));
        assert!(!store.contains(user_id).await);

        // Record is gone, so a retry reports not-found rather than expired
        let result = store.verify_and_consume(user_id, code).await;
        assert!(matches!(result, Err(UserError::OtpNotFound)));
    }

    #[tokio::test]
    async fn test_reissue_supersedes_prior_code() {
        let store = OtpStore::new();
        let user_id = Uuid::now_v7();

        store.issue(user_id).await;
        let latest = store.issue(user_id).await;

        // Only the latest code verifies
        store.verify_and_consume(user_id, latest).await.unwrap();
        assert!(!store.contains(user_id).await);
    }

    #[tokio::test]
    async fn test_users_do_not_interfere() {
        let store = OtpStore::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        let alice_code = store.issue(alice).await;
        let bob_code = store.issue(bob).await;

        store.verify_and_consume(alice, alice_code).await.unwrap();
        assert!(store.contains(bob).await);
        store.verify_and_consume(bob, bob_code).await.unwrap();
    }
}
