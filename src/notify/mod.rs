//! Outbound delivery of the composed message
//!
//! A channel sends exactly once. Nothing here retries: a rejected send is
//! reported as a failed `DispatchResult` and the run moves on.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::{ChannelKind, NotificationConfig};
use crate::models::{DispatchResult, NotificationMessage, OutboundMessage};
use crate::{Result, WeatherTextError};

pub mod email;
pub mod twilio;

pub use email::EmailChannel;
pub use twilio::TwilioChannel;

#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Sends one message and returns the channel's delivery reference
    async fn send(&self, message: &OutboundMessage) -> Result<String>;
}

/// Sends the finished message from a fixed sender to a fixed recipient
pub struct NotificationDispatcher {
    channel: Arc<dyn MessageChannel>,
    from: String,
    to: String,
}

impl NotificationDispatcher {
    pub fn new(
        channel: Arc<dyn MessageChannel>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let channel: Arc<dyn MessageChannel> = match config.channel {
            ChannelKind::Sms => Arc::new(TwilioChannel::from_config(config)?),
            ChannelKind::Email => Arc::new(EmailChannel::from_config(config)?),
        };
        if let Some(topic) = &config.topic {
            info!("Topic {} is configured but only the direct recipient is notified", topic);
        }
        Ok(Self::new(channel, &config.from, &config.to))
    }

    /// Single attempt; the outcome is returned, never raised. Whatever the
    /// channel failed with is recorded as a dispatch failure.
    #[tracing::instrument(skip_all, fields(channel = self.channel.name()))]
    pub async fn dispatch(&self, message: &NotificationMessage) -> DispatchResult {
        let outbound = OutboundMessage {
            body: message.as_str().to_string(),
            from: self.from.clone(),
            to: self.to.clone(),
        };

        match self.channel.send(&outbound).await {
            Ok(reference) => {
                info!("Message delivered, reference {}", reference);
                DispatchResult::Success { reference }
            }
            Err(e) => {
                error!("Message dispatch failed: {}", e);
                let detail = match e {
                    WeatherTextError::Dispatch { message } => message,
                    other => other.to_string(),
                };
                DispatchResult::Failure { detail }
            }
        }
    }
}
