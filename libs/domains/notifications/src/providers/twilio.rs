//! Twilio SMS provider implementation.

use super::{SentSms, SmsContent, SmsProvider};
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

/// Twilio API configuration.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio account SID.
    pub account_sid: String,
    /// Twilio auth token.
    pub auth_token: String,
    /// Sender phone number.
    pub from_number: String,
    /// Twilio API base URL (defaults to production).
    pub api_url: String,
}

impl TwilioConfig {
    /// Create a new Twilio configuration.
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            account_sid,
            auth_token,
            from_number,
            api_url: "https://api.twilio.com/2010-04-01".to_string(),
        }
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, NotificationError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").map_err(|_| {
            NotificationError::ConfigError("TWILIO_ACCOUNT_SID not set".to_string())
        })?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| NotificationError::ConfigError("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = std::env::var("TWILIO_FROM_NUMBER").map_err(|_| {
            NotificationError::ConfigError("TWILIO_FROM_NUMBER not set".to_string())
        })?;

        Ok(Self::new(account_sid, auth_token, from_number))
    }
}

/// Twilio SMS provider.
pub struct TwilioProvider {
    config: TwilioConfig,
    client: Client,
}

impl TwilioProvider {
    /// Create a new Twilio provider.
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> Result<Self, NotificationError> {
        let config = TwilioConfig::from_env()?;
        Ok(Self::new(config))
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_url, self.config.account_sid
        )
    }
}

// Twilio API response structures

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    code: Option<i64>,
    message: String,
}

// Twilio error code for invalid 'To' numbers.
const ERR_INVALID_TO_NUMBER: i64 = 21211;

#[async_trait]
impl SmsProvider for TwilioProvider {
    async fn send(&self, sms: &SmsContent) -> NotificationResult<SentSms> {
        let params = [
            ("To", sms.to_number.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", sms.body.as_str()),
        ];

        debug!(to = %sms.to_number, "Sending SMS via Twilio");

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let message: TwilioMessageResponse = response.json().await?;

            info!(
                message_sid = %message.sid,
                delivery_status = %message.status,
                to = %sms.to_number,
                "SMS accepted by Twilio"
            );

            Ok(SentSms {
                message_id: Some(message.sid),
                accepted: true,
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            let detail: Option<TwilioErrorResponse> = serde_json::from_str(&body).ok();

            error!(
                http_status = %status,
                to = %sms.to_number,
                error = %body,
                "Twilio rejected SMS"
            );

            match detail {
                Some(e) if e.code == Some(ERR_INVALID_TO_NUMBER) => Err(
                    NotificationError::InvalidPhoneNumber(sms.to_number.clone()),
                ),
                Some(e) => Err(NotificationError::ProviderError(e.message)),
                None => Err(NotificationError::ProviderError(format!(
                    "Twilio returned {}: {}",
                    status, body
                ))),
            }
        }
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}
