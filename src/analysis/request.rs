use crate::models::AnalysisRequest;
use crate::{Error, Result};

/// Fields the pipeline consumes, borrowed from a checked request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFields<'a> {
    pub image_data: &'a str,
    pub context: &'a str,
}

/// Both `imageData` and `context` must be present and non-empty.
pub fn require_fields(request: &AnalysisRequest) -> Result<RequiredFields<'_>> {
    match (request.image_data.as_deref(), request.context.as_deref()) {
        (Some(image_data), Some(context)) if !image_data.is_empty() && !context.is_empty() => {
            Ok(RequiredFields {
                image_data,
                context,
            })
        }
        _ => Err(Error::MissingField),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_fields_present() {
        let request = AnalysisRequest::new("data:image/jpeg;base64,AAAA", "corn");
        let fields = require_fields(&request).unwrap();
        assert_eq!(fields.image_data, "data:image/jpeg;base64,AAAA");
        assert_eq!(fields.context, "corn");
    }

    #[test]
    fn test_missing_or_empty_fields_rejected() {
        let cases = [
            AnalysisRequest::default(),
            AnalysisRequest {
                image_data: Some("data:,AA".to_string()),
                context: None,
            },
            AnalysisRequest {
                image_data: None,
                context: Some("corn".to_string()),
            },
            AnalysisRequest::new("", "corn"),
            AnalysisRequest::new("data:,AA", ""),
        ];

        for request in cases {
            assert!(matches!(
                require_fields(&request).unwrap_err(),
                Error::MissingField
            ));
        }
    }
}
