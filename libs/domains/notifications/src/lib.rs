//! Notifications Domain
//!
//! SMS delivery for the signup flow. The domain exposes a single
//! `SmsProvider` trait so the delivery channel can be swapped without
//! touching callers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Signup Service │  ← composes the OTP message
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │   SmsProvider   │  ← Twilio, in-memory, ...
//! └─────────────────┘
//! ```
//!
//! Delivery is a single attempt: a provider failure is surfaced to the
//! caller as an error, never retried here.

pub mod error;
pub mod providers;

// Re-export commonly used types
pub use error::{NotificationError, NotificationResult};
pub use providers::{InMemorySmsProvider, SentSms, SmsContent, SmsProvider, TwilioProvider};
