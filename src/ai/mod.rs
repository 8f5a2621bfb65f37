//! Multimodal inference integration
//!
//! Sends the diagnosis prompt and field photo to the inference provider and
//! returns the reply text untouched. Interpreting that text is the
//! pipeline's job.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiHttpClient, GeminiVisionClient};
pub use mock::MockInferenceClient;

use crate::image::ImagePayload;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InferenceService: Send + Sync {
    /// One call to the provider, no retries.
    async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<String>;

    /// Whether a credential is available. Reported by the health route.
    fn is_configured(&self) -> bool {
        true
    }
}
