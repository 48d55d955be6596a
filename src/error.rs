// src/error.rs

//! Unified error handling for the event harvester.

use std::fmt;

use thiserror::Error;

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Bot-mitigation challenge page served instead of content
    #[error("Bot challenge detected at {url}")]
    Challenge { url: String },

    /// Per-source deadline exceeded
    #[error("Deadline exceeded for source '{0}'")]
    Deadline(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Scraping error with source context
    #[error("Scrape error for {context}: {message}")]
    Scrape { context: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a scrape error with context.
    pub fn scrape(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Scrape {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Short class label for run reports ("http", "challenge", ...).
    pub fn class(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Status { .. } => "status",
            Self::Challenge { .. } => "challenge",
            Self::Deadline(_) => "timeout",
            Self::Io(_) => "io",
            Self::Json(_) | Self::Toml(_) | Self::TomlSerialize(_) => "parse",
            Self::Url(_) | Self::Selector { .. } => "parse",
            Self::Config(_) | Self::Validation(_) => "config",
            Self::Scrape { .. } => "scrape",
        }
    }

    /// Whether the fetcher should retry after this error.
    ///
    /// Transient network failures and 5xx responses are retryable;
    /// definitive 4xx client errors are not. Challenge pages get one pass
    /// through the retry budget since some interstitials clear on a
    /// second request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Challenge { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_labels() {
        let err = AppError::Challenge {
            url: "https://example.edu".to_string(),
        };
        assert_eq!(err.class(), "challenge");
        assert_eq!(AppError::config("x").class(), "config");
    }

    #[test]
    fn test_retryable_status() {
        let transient = AppError::Status {
            url: "u".to_string(),
            status: 503,
        };
        let definitive = AppError::Status {
            url: "u".to_string(),
            status: 404,
        };
        assert!(transient.is_retryable());
        assert!(!definitive.is_retryable());
    }
}
