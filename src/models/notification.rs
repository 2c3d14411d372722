//! Composed message and dispatch outcome

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::WeatherTextError;

/// The finished message text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NotificationMessage(String);

impl NotificationMessage {
    #[must_use]
    pub fn new(text: String) -> Self {
        Self(text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NotificationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a channel is asked to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub body: String,
    pub from: String,
    pub to: String,
}

/// Outcome of the single send attempt
///
/// A failure keeps only the error text so the result stays `Clone` and
/// serializable. Every failure is a dispatch failure; `error()` turns it back
/// into a `WeatherTextError::Dispatch`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Accepted by the channel, with its delivery reference
    Success { reference: String },
    /// Rejected or failed, with the error text
    Failure { detail: String },
}

impl DispatchResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure as a `Dispatch` error, `None` on success
    #[must_use]
    pub fn error(&self) -> Option<WeatherTextError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { detail } => Some(WeatherTextError::dispatch(detail.clone())),
        }
    }
}
