//! Error handling and custom error types
//!
//! Every way an analysis can fail maps onto one variant of [`Error`]. The
//! variant decides the HTTP status, the caller-safe message, and whether the
//! fallback result travels with the failure. Diagnostic detail (provider
//! bodies, raw model replies) is logged where the error is raised and never
//! carried into the caller-facing text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required fields: imageData and context")]
    MissingField,

    #[error("Invalid image data format")]
    InvalidImageFormat,

    #[error("Invalid request body: {0}")]
    MalformedRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("AI provider error (status {status:?}): {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed provider envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Failed to parse AI response: {0}")]
    ResponseParse(String),

    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status the failure is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingField | Error::InvalidImageFormat | Error::MalformedRequest(_) => 400,
            _ => 500,
        }
    }

    /// Short message safe to show the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Error::MissingField => "Missing required fields: imageData and context",
            Error::InvalidImageFormat => "Invalid image data format",
            Error::MalformedRequest(_) => "Invalid request body",
            Error::Configuration(_) => "Gemini API key not configured",
            Error::Provider { .. } => "AI analysis failed",
            Error::MalformedEnvelope(_) => "Invalid API response structure",
            Error::ResponseParse(_) => "Failed to parse AI response",
            Error::SchemaValidation(_) => "AI returned incomplete analysis",
            Error::Internal(_) => "Internal server error during analysis",
        }
    }

    /// Optional caller-safe detail line.
    pub fn public_details(&self) -> Option<String> {
        match self {
            Error::Provider {
                status: Some(status),
                ..
            } => Some(format!("API returned {}", status)),
            Error::Provider { status: None, .. } => Some("API request failed".to_string()),
            Error::ResponseParse(_) => Some("AI returned invalid JSON format".to_string()),
            _ => None,
        }
    }

    /// Input validation failures are reported bare; everything past them
    /// carries the fallback result.
    pub fn carries_fallback(&self) -> bool {
        self.status_code() != 400
    }
}

pub type Result<T> = std::result::Result<T, Error>;
