use async_trait::async_trait;
use lettre::{
    Message, Transport, transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};

use super::MessageChannel;
use crate::config::NotificationConfig;
use crate::models::OutboundMessage;
use crate::{Result, WeatherTextError};

const SUBJECT: &str = "Weather Text";

pub struct EmailChannel {
    relay: String,
    credentials: Option<Credentials>,
}

impl EmailChannel {
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let relay = config
            .smtp_relay
            .clone()
            .ok_or_else(|| WeatherTextError::config("Missing SMTP relay host"))?;

        let credentials = match (&config.smtp_username, &config.smtp_password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ => None,
        };

        Ok(Self { relay, credentials })
    }

    fn create_mailer(&self) -> Result<SmtpTransport> {
        let mut builder = SmtpTransport::relay(&self.relay)
            .map_err(|e| WeatherTextError::dispatch(format!("Invalid SMTP relay: {e}")))?;
        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }
        Ok(builder.build())
    }
}

fn build_email(message: &OutboundMessage) -> Result<Message> {
    Message::builder()
        .from(message.from.parse().map_err(|e| {
            WeatherTextError::dispatch(format!("Failed to parse from address: {e}"))
        })?)
        .to(message
            .to
            .parse()
            .map_err(|e| WeatherTextError::dispatch(format!("Failed to parse to address: {e}")))?)
        .subject(SUBJECT)
        .body(message.body.clone())
        .map_err(|e| WeatherTextError::dispatch(e.to_string()))
}

#[async_trait]
impl MessageChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, message: &OutboundMessage) -> Result<String> {
        let email = build_email(message)?;
        let mailer = self.create_mailer()?;

        let response = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| WeatherTextError::dispatch(e.to_string()))?
            .map_err(|e| WeatherTextError::dispatch(format!("Failed to send email: {e}")))?;

        tracing::info!("Sent weather email to {}", message.to);

        Ok(response
            .first_line()
            .map(str::to_string)
            .unwrap_or_else(|| response.code().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound(from: &str, to: &str) -> OutboundMessage {
        OutboundMessage {
            body: "temp: 72°".to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn builds_message_from_addresses() {
        let email = build_email(&outbound("Weather <bot@example.com>", "me@example.com")).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: Weather Text"));
        assert!(raw.contains("To: me@example.com"));
    }

    #[test]
    fn rejects_bad_recipient() {
        let err = build_email(&outbound("bot@example.com", "not an address")).unwrap_err();
        assert!(err.to_string().contains("to address"));
    }

    #[test]
    fn from_config_needs_relay() {
        assert!(EmailChannel::from_config(&NotificationConfig::default()).is_err());

        let config = NotificationConfig {
            smtp_relay: Some("smtp.example.com".to_string()),
            smtp_username: Some("bot@example.com".to_string()),
            smtp_password: Some("app-password".to_string()),
            ..NotificationConfig::default()
        };
        let channel = EmailChannel::from_config(&config).unwrap();
        assert!(channel.credentials.is_some());
    }
}
