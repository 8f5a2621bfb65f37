use crate::models::AnalysisResult;
use crate::{Error, Result};
use serde_json::Value;

/// Minimum entries in each recommendation list.
pub const MIN_RECOMMENDATIONS: usize = 3;

/// Parse cleaned reply text and check it against the diagnosis schema.
///
/// `raw` is the reply before cleaning; it only goes to the log.
pub fn parse_analysis(cleaned: &str, raw: &str) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        tracing::error!("JSON parse error in AI response: {}", e);
        tracing::error!("Raw AI response: {}", raw);
        Error::ResponseParse(e.to_string())
    })?;

    validate_schema(value)
}

/// All-or-nothing schema check of an already-parsed value.
pub fn validate_schema(value: Value) -> Result<AnalysisResult> {
    let result: AnalysisResult = serde_json::from_value(value.clone()).map_err(|e| {
        tracing::error!("Invalid result structure ({}): {}", e, value);
        Error::SchemaValidation(e.to_string())
    })?;

    check_constraints(&result).map_err(|reason| {
        tracing::error!("Invalid result structure ({}): {}", reason, value);
        Error::SchemaValidation(reason)
    })?;

    Ok(result)
}

fn check_constraints(result: &AnalysisResult) -> std::result::Result<(), String> {
    match result.identification.confidence_value() {
        Some(confidence) if (0.0..=100.0).contains(&confidence) => {}
        _ => {
            return Err(format!(
                "confidence {} is outside 0-100",
                result.identification.confidence
            ))
        }
    }

    if result.description.trim().is_empty() {
        return Err("description is empty".to_string());
    }

    let recommendations = &result.recommendations;
    for (name, list) in [
        ("nonChemical", &recommendations.non_chemical),
        ("chemical", &recommendations.chemical),
    ] {
        if list.len() < MIN_RECOMMENDATIONS {
            return Err(format!(
                "recommendations.{} has {} entries, need at least {}",
                name,
                list.len(),
                MIN_RECOMMENDATIONS
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn valid() -> Value {
        json!({
            "identification": {
                "commonName": "Gray Leaf Spot",
                "scientificName": "Cercospora zeae-maydis",
                "confidence": 82
            },
            "description": "Rectangular tan lesions bounded by leaf veins.",
            "recommendations": {
                "nonChemical": ["Rotate away from corn", "Bury residue", "Plant resistant hybrids"],
                "chemical": ["Apply a triazole", "Time at VT/R1", "Follow label rates"]
            }
        })
    }

    fn assert_schema_error(value: Value) {
        let err = validate_schema(value).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)), "got {:?}", err);
    }

    #[test]
    fn test_valid_value_round_trips_unchanged() {
        let result = validate_schema(valid()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), valid());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_analysis("{\"identification\": ", "raw").unwrap_err();
        assert!(matches!(err, Error::ResponseParse(_)));
    }

    #[test]
    fn test_parse_failure_logs_raw_reply_but_does_not_return_it() {
        let raw = "```json\nThe leaves show rust-7f3a, not sure of the JSON\n```";
        let cleaned = "The leaves show rust-7f3a, not sure of the JSON";

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let err = tracing::subscriber::with_default(subscriber, || {
            parse_analysis(cleaned, raw).unwrap_err()
        });

        assert!(matches!(err, Error::ResponseParse(_)));
        assert!(!err.to_string().contains("rust-7f3a"));

        let output = logs.contents();
        assert!(output.contains("JSON parse error in AI response"));
        assert!(output.contains("Raw AI response: ```json"));
        assert!(output.contains("rust-7f3a"));
    }

    #[test]
    fn test_two_non_chemical_entries_rejected() {
        let mut value = valid();
        value["recommendations"]["nonChemical"] = json!(["a", "b"]);
        assert_schema_error(value);
    }

    #[test]
    fn test_two_chemical_entries_rejected() {
        let mut value = valid();
        value["recommendations"]["chemical"] = json!(["a", "b"]);
        assert_schema_error(value);
    }

    #[test]
    fn test_string_confidence_rejected() {
        let mut value = valid();
        value["identification"]["confidence"] = json!("82");
        assert_schema_error(value);
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let mut value = valid();
        value["identification"]["confidence"] = json!(120);
        assert_schema_error(value);

        let mut value = valid();
        value["identification"]["confidence"] = json!(-1);
        assert_schema_error(value);
    }

    #[test]
    fn test_fractional_confidence_accepted() {
        let mut value = valid();
        value["identification"]["confidence"] = json!(67.5);
        let result = validate_schema(value).unwrap();
        assert_eq!(result.identification.confidence_value(), Some(67.5));
    }

    #[test]
    fn test_missing_keys_rejected() {
        for pointer in [
            "identification",
            "description",
            "recommendations",
        ] {
            let mut value = valid();
            value.as_object_mut().unwrap().remove(pointer);
            assert_schema_error(value);
        }

        let mut value = valid();
        value["identification"]
            .as_object_mut()
            .unwrap()
            .remove("scientificName");
        assert_schema_error(value);
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut value = valid();
        value["description"] = json!("");
        assert_schema_error(value);
    }

    #[test]
    fn test_non_string_recommendation_rejected() {
        let mut value = valid();
        value["recommendations"]["chemical"] = json!(["a", 2, "c"]);
        assert_schema_error(value);
    }

    #[test]
    fn test_non_object_rejected() {
        assert_schema_error(json!([1, 2, 3]));
        assert_schema_error(json!(null));
    }
}
