use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerationConfig, HarmBlockThreshold, HarmCategory,
    InlineData, Part, SafetySetting,
};
use crate::ai::InferenceService;
use crate::image::{ImagePayload, UPLOAD_MIME_TYPE};
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;

/// Gemini vision call used for crop diagnosis.
pub struct GeminiVisionClient {
    http: GeminiHttpClient,
}

impl GeminiVisionClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    /// Build the client from process configuration, sharing `client`'s
    /// connection pool.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let http = GeminiHttpClient::new_with_client(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_timeout,
            client,
        )
        .with_base_url(config.gemini_base_url.clone());
        Self::new(http)
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    fn generation_config() -> GenerationConfig {
        GenerationConfig {
            temperature: 0.1,
            top_k: 32,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }

    fn safety_settings() -> Vec<SafetySetting> {
        [HarmCategory::Harassment, HarmCategory::HateSpeech]
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold: HarmBlockThreshold::BlockMediumAndAbove,
            })
            .collect()
    }

    fn build_request(prompt: &str, image: &ImagePayload) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: UPLOAD_MIME_TYPE.to_string(),
                            data: image.data.clone(),
                        },
                    },
                ],
            }],
            generation_config: Self::generation_config(),
            safety_settings: Self::safety_settings(),
        }
    }
}

#[async_trait]
impl InferenceService for GeminiVisionClient {
    async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<String> {
        tracing::debug!(
            "Sending vision request to Gemini (model: {}, declared mime: {}, {} base64 chars)",
            self.http.model(),
            image.declared_mime.as_deref().unwrap_or("unknown"),
            image.data.len()
        );

        let request = Self::build_request(prompt, image);
        let response = self.http.generate_content(&request).await?;

        match response.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                tracing::error!(
                    "Unexpected Gemini response structure (candidates: {}, reason: {})",
                    response.candidates.len(),
                    response.block_reason().unwrap_or("none")
                );
                Err(Error::MalformedEnvelope(
                    "candidates[0].content.parts[0].text is missing".to_string(),
                ))
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.http.has_api_key()
    }
}
