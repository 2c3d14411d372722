//! Error types and handling for the weather text job

use thiserror::Error;

/// Main error type for the weather text job
#[derive(Error, Debug)]
pub enum WeatherTextError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An upstream weather call failed or timed out
    #[error("Network error from {source_name}: {message}")]
    NetworkFetch {
        source_name: String,
        message: String,
    },

    /// A required value was absent, or the call producing it never ran
    #[error("Missing data: {field}")]
    MissingData { field: String },

    /// The notification channel rejected or failed the send
    #[error("Dispatch error: {message}")]
    Dispatch { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherTextError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error attributed to an upstream provider
    pub fn network<N: Into<String>, S: Into<String>>(source_name: N, message: S) -> Self {
        Self::NetworkFetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a new missing data error
    pub fn missing<S: Into<String>>(field: S) -> Self {
        Self::MissingData {
            field: field.into(),
        }
    }

    /// Create a new dispatch error
    pub fn dispatch<S: Into<String>>(message: S) -> Self {
        Self::Dispatch {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Self::MissingData { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherTextError::Config { .. } => {
                "Configuration error. Please check your environment and API keys.".to_string()
            }
            WeatherTextError::NetworkFetch { source_name, .. } => {
                format!("Unable to reach {source_name}. Please check your internet connection.")
            }
            WeatherTextError::MissingData { field } => {
                format!("Weather data incomplete, no message sent ({field})")
            }
            WeatherTextError::Dispatch { .. } => {
                "The notification could not be delivered.".to_string()
            }
            WeatherTextError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
