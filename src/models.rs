//! Data models and structures
//!
//! Defines the inbound analysis request, the diagnosis schema returned to
//! callers, the response bodies, and process configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::time::Duration;

/// Inbound body of `POST /api/analyze`.
///
/// Both fields are optional at the decode level so that a missing field is
/// reported as [`crate::Error::MissingField`] instead of a JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl AnalysisRequest {
    pub fn new(image_data: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            image_data: Some(image_data.into()),
            context: Some(context.into()),
        }
    }
}

/// Crop issue diagnosis.
///
/// Keys the schema does not name are kept in `extra` so a valid model reply is
/// handed back exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub identification: Identification,
    pub description: String,
    pub recommendations: Recommendations,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub common_name: String,
    pub scientific_name: String,
    /// Kept as a JSON number so integers are not rewritten as floats.
    pub confidence: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identification {
    pub fn confidence_value(&self) -> Option<f64> {
        self.confidence.as_f64()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub non_chemical: Vec<String>,
    pub chemical: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body returned with status 200.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSuccess {
    pub success: bool,
    pub result: AnalysisResult,
    /// ISO-8601 UTC.
    pub timestamp: String,
}

/// Body returned with a 4xx/5xx status.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<AnalysisResult>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub gemini_configured: bool,
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Absence is not fatal: the service starts and reports it per request.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_timeout = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                crate::Error::Configuration(format!(
                    "GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_GEMINI_TIMEOUT_SECS,
        };

        Ok(Self {
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_timeout: Duration::from_secs(gemini_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_request_uses_camel_case_and_tolerates_missing_fields() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"imageData":"data:image/png;base64,AA"}"#).unwrap();
        assert_eq!(request.image_data.as_deref(), Some("data:image/png;base64,AA"));
        assert!(request.context.is_none());
    }

    #[test]
    fn test_result_preserves_unknown_keys_and_integer_confidence() {
        let input = serde_json::json!({
            "identification": {
                "commonName": "Waterhemp",
                "scientificName": "Amaranthus tuberculatus",
                "confidence": 91,
                "stage": "V4"
            },
            "description": "Small-seeded broadleaf weed.",
            "recommendations": {
                "nonChemical": ["a", "b", "c"],
                "chemical": ["d", "e", "f"]
            },
            "notes": "scouted at dawn"
        });

        let result: AnalysisResult = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(result.identification.confidence_value(), Some(91.0));
        assert_eq!(serde_json::to_value(&result).unwrap(), input);
    }

    #[test]
    fn test_failure_omits_absent_optional_fields() {
        let failure = AnalysisFailure {
            error: "Invalid image data format".to_string(),
            details: None,
            fallback: None,
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid image data format" }));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(
            config.gemini_timeout,
            Duration::from_secs(DEFAULT_GEMINI_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_config_blank_key_counts_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, crate::Error::Configuration(_)));
    }
}
