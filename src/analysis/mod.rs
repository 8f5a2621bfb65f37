//! Crop issue analysis pipeline
//!
//! Request validation, image extraction, prompt construction, the provider
//! call, reply repair, schema validation, and the fallback result. Each step
//! short-circuits the ones after it.

pub mod extract;
pub mod fallback;
pub mod pipeline;
pub mod request;
pub mod validate;

pub use extract::clean_response_text;
pub use fallback::fallback_result;
pub use pipeline::{AnalysisPipeline, AnalysisResponse};
pub use request::require_fields;
pub use validate::{parse_analysis, validate_schema, MIN_RECOMMENDATIONS};
