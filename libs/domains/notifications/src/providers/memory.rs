//! In-memory SMS provider for development and tests.

use super::{SentSms, SmsContent, SmsProvider};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// SMS provider that records messages instead of delivering them.
///
/// Used in development (no Twilio credentials configured) and in tests
/// that need to observe what would have been sent. Can be switched into
/// a failing mode to exercise delivery-error paths.
#[derive(Debug, Default, Clone)]
pub struct InMemorySmsProvider {
    sent: Arc<RwLock<Vec<SmsContent>>>,
    fail_next: Arc<AtomicBool>,
}

impl InMemorySmsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages accepted so far, in send order.
    pub async fn sent(&self) -> Vec<SmsContent> {
        self.sent.read().await.clone()
    }

    /// Make the next `send` call fail with a provider error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SmsProvider for InMemorySmsProvider {
    async fn send(&self, sms: &SmsContent) -> NotificationResult<SentSms> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(NotificationError::ProviderError(
                "simulated delivery failure".to_string(),
            ));
        }

        info!(to = %sms.to_number, body = %sms.body, "SMS captured by in-memory provider");

        let mut sent = self.sent.write().await;
        sent.push(sms.clone());

        Ok(SentSms {
            message_id: Some(format!("mem-{}", sent.len())),
            accepted: true,
        })
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_sent_messages() {
        let provider = InMemorySmsProvider::new();

        let sms = SmsContent {
            to_number: "+15551234567".to_string(),
            body: "hello".to_string(),
        };

        let sent = provider.send(&sms).await.unwrap();
        assert!(sent.accepted);
        assert_eq!(sent.message_id.as_deref(), Some("mem-1"));

        let recorded = provider.sent().await;
        assert_eq!(recorded, vec![sms]);
    }

    #[tokio::test]
    async fn test_fail_next_fails_once() {
        let provider = InMemorySmsProvider::new();
        provider.fail_next();

        let sms = SmsContent {
            to_number: "+15551234567".to_string(),
            body: "hello".to_string(),
        };

        let err = provider.send(&sms).await.unwrap_err();
        assert!(matches!(err, NotificationError::ProviderError(_)));
        assert!(provider.sent().await.is_empty());

        // Subsequent sends succeed again
        provider.send(&sms).await.unwrap();
        assert_eq!(provider.sent().await.len(), 1);
    }
}
