use crate::models::{AnalysisResult, Identification, Recommendations};
use serde_json::{Map, Number};

/// Placeholder diagnosis attached to every failure past input validation.
///
/// Fixed content; callers display it instead of handling an empty result.
pub fn fallback_result() -> AnalysisResult {
    AnalysisResult {
        identification: Identification {
            common_name: "Unknown Agricultural Issue".to_string(),
            scientific_name: "Analysis unavailable".to_string(),
            confidence: Number::from(0),
            extra: Map::new(),
        },
        description: "Unable to complete AI analysis at this time. Please try again later or consult with a local agricultural extension office for identification assistance.".to_string(),
        recommendations: Recommendations {
            non_chemical: vec![
                "Document the issue with additional photos from different angles".to_string(),
                "Consult with local agricultural extension services".to_string(),
                "Monitor the affected area for changes or spread".to_string(),
            ],
            chemical: vec![
                "Consult with a certified crop advisor before applying treatments".to_string(),
                "Consider soil testing if the issue appears to be nutrient-related".to_string(),
                "Follow all label instructions for any approved treatments".to_string(),
            ],
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}
