use std::time::Duration;
use thiserror::Error;

/// Errors returned by the TTS providers
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("{provider} error{}: {message}", .status_code.map(|c| format!(" ({})", c)).unwrap_or_default())]
    Api {
        provider: &'static str,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Synthesis canceled (HTTP {status_code}): {details}")]
    Canceled { status_code: u16, details: String },

    #[error("Synthesis timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, TtsError>;

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        TtsError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_status() {
        let err = TtsError::Api {
            provider: "Google Cloud TTS",
            message: "API key not valid".to_string(),
            status_code: Some(403),
        };
        assert_eq!(err.to_string(), "Google Cloud TTS error (403): API key not valid");
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = TtsError::Api {
            provider: "Azure Speech",
            message: "boom".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "Azure Speech error: boom");
    }

    #[test]
    fn test_timeout_display() {
        let err = TtsError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Synthesis timed out after 10s");
    }
}
