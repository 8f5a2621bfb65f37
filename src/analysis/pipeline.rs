use super::{clean_response_text, fallback_result, parse_analysis, require_fields};
use crate::ai::InferenceService;
use crate::image::decode_data_url;
use crate::models::{AnalysisFailure, AnalysisRequest, AnalysisResult, AnalysisSuccess};
use crate::{prompts, Error, Result};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Outcome of one analysis, ready to be written as an HTTP response.
#[derive(Debug, Clone)]
pub enum AnalysisResponse {
    Success(AnalysisSuccess),
    Failure { status: u16, body: AnalysisFailure },
}

impl AnalysisResponse {
    pub fn success(result: AnalysisResult) -> Self {
        AnalysisResponse::Success(AnalysisSuccess {
            success: true,
            result,
            timestamp: timestamp_now(),
        })
    }

    pub fn from_error(err: &Error) -> Self {
        AnalysisResponse::Failure {
            status: err.status_code(),
            body: AnalysisFailure {
                error: err.public_message().to_string(),
                details: err.public_details(),
                fallback: err.carries_fallback().then(fallback_result),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisResponse::Success(_) => 200,
            AnalysisResponse::Failure { status, .. } => *status,
        }
    }
}

pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Stateless per-request pipeline; share it behind an `Arc`.
pub struct AnalysisPipeline {
    inference: Arc<dyn InferenceService>,
}

impl AnalysisPipeline {
    pub fn new(inference: Arc<dyn InferenceService>) -> Self {
        Self { inference }
    }

    pub fn is_configured(&self) -> bool {
        self.inference.is_configured()
    }

    /// Run every step, stopping at the first failure.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let fields = require_fields(request)?;
        let image = decode_data_url(fields.image_data)?;
        let prompt = prompts::analysis_prompt(fields.context);

        let raw = self.inference.generate(&prompt, &image).await?;
        let cleaned = clean_response_text(&raw);

        parse_analysis(&cleaned, &raw)
    }

    /// Run the pipeline and convert any failure into a response body.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResponse {
        let request_id = Uuid::new_v4();

        async {
            match self.run(request).await {
                Ok(result) => {
                    info!(
                        common_name = %result.identification.common_name,
                        scientific_name = %result.identification.scientific_name,
                        confidence = %result.identification.confidence,
                        "Successful analysis"
                    );
                    AnalysisResponse::success(result)
                }
                Err(e) => {
                    if e.status_code() == 400 {
                        warn!("Rejected analysis request: {}", e);
                    } else {
                        error!("Analysis failed: {}", e);
                    }
                    AnalysisResponse::from_error(&e)
                }
            }
        }
        .instrument(info_span!("analysis", %request_id))
        .await
    }
}
