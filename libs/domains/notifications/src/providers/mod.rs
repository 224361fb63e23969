//! SMS provider implementations.
//!
//! This module contains the `SmsProvider` trait and implementations
//! for different SMS delivery services.

mod memory;
mod twilio;

pub use memory::InMemorySmsProvider;
pub use twilio::{TwilioConfig, TwilioProvider};

use crate::error::NotificationResult;
use async_trait::async_trait;

/// Represents a sent SMS with provider-specific message ID.
#[derive(Debug, Clone)]
pub struct SentSms {
    /// Provider-specific message ID for tracking.
    pub message_id: Option<String>,
    /// Whether the message was accepted for delivery.
    pub accepted: bool,
}

/// SMS content ready for sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsContent {
    /// Recipient phone number (E.164 preferred).
    pub to_number: String,
    /// Message body.
    pub body: String,
}

/// Trait for SMS sending providers.
///
/// Implementations are expected to attempt delivery exactly once and
/// surface failures; retry policy belongs to the caller, if anywhere.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Send an SMS.
    async fn send(&self, sms: &SmsContent) -> NotificationResult<SentSms>;

    /// Get the provider name for logging.
    fn name(&self) -> &'static str;
}
