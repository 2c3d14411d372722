//! Twilio programmable SMS

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::MessageChannel;
use crate::config::NotificationConfig;
use crate::models::OutboundMessage;
use crate::{Result, WeatherTextError};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TwilioChannel {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioChannel {
    pub fn new(client: Client, base_url: &str, account_sid: &str, auth_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let account_sid = config
            .twilio_account_sid
            .as_deref()
            .ok_or_else(|| WeatherTextError::config("Missing TWILIO_ACCOUNT_SID"))?;
        let auth_token = config
            .twilio_auth_token
            .as_deref()
            .ok_or_else(|| WeatherTextError::config("Missing TWILIO_AUTH_TOKEN"))?;

        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| WeatherTextError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::new(client, &config.twilio_base_url, account_sid, auth_token))
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url,
            urlencoding::encode(&self.account_sid)
        )
    }
}

/// Created message resource, only the id matters here
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Twilio's error body
#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u32>,
    message: Option<String>,
}

fn describe_rejection(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            code,
            message: Some(message),
        }) => match code {
            Some(code) => format!("HTTP {}: {} (code {})", status.as_u16(), message, code),
            None => format!("HTTP {}: {}", status.as_u16(), message),
        },
        _ => format!("HTTP {}: {}", status.as_u16(), body.trim()),
    }
}

#[async_trait]
impl MessageChannel for TwilioChannel {
    fn name(&self) -> &'static str {
        "twilio"
    }

    async fn send(&self, message: &OutboundMessage) -> Result<String> {
        let form = [
            ("To", message.to.as_str()),
            ("From", message.from.as_str()),
            ("Body", message.body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| WeatherTextError::dispatch(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherTextError::dispatch(e.to_string()))?;

        if !status.is_success() {
            return Err(WeatherTextError::dispatch(describe_rejection(status, &body)));
        }

        let resource: MessageResource = serde_json::from_str(&body)
            .map_err(|e| WeatherTextError::dispatch(format!("Unreadable Twilio response: {e}")))?;
        Ok(resource.sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn messages_url_includes_account() {
        let channel = TwilioChannel::new(
            Client::new(),
            "https://api.twilio.com/2010-04-01/",
            "AC123",
            "token",
        );
        assert_eq!(
            channel.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn rejection_uses_twilio_message() {
        let body = r#"{
            "code": 21211,
            "message": "The 'To' number +1555 is not a valid phone number.",
            "more_info": "https://www.twilio.com/docs/errors/21211",
            "status": 400
        }"#;
        assert_eq!(
            describe_rejection(StatusCode::BAD_REQUEST, body),
            "HTTP 400: The 'To' number +1555 is not a valid phone number. (code 21211)"
        );
    }

    #[test]
    fn rejection_falls_back_to_raw_body() {
        assert_eq!(
            describe_rejection(StatusCode::BAD_GATEWAY, " upstream down \n"),
            "HTTP 502: upstream down"
        );
    }

    #[test]
    fn parses_created_message() {
        let body = r#"{"sid": "SM1f0e8ae6ade43cb3c0ce4525424e404f", "status": "queued"}"#;
        let resource: MessageResource = serde_json::from_str(body).unwrap();
        assert_eq!(resource.sid, "SM1f0e8ae6ade43cb3c0ce4525424e404f");
    }

    #[test]
    fn from_config_requires_credentials() {
        let config = NotificationConfig::default();
        assert!(TwilioChannel::from_config(&config).is_err());
    }
}
