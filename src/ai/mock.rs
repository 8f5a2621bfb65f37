use super::InferenceService;
use crate::image::ImagePayload;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    ProviderStatus(u16),
    MalformedEnvelope,
}

/// Scripted [`InferenceService`] for pipeline and route tests.
///
/// Replies are served in order and cycle once exhausted. With no replies
/// queued a fixed valid diagnosis is returned.
pub struct MockInferenceClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    configured: bool,
}

pub const DEFAULT_MOCK_REPLY: &str = r#"{"identification":{"commonName":"Northern Corn Leaf Blight","scientificName":"Exserohilum turcicum","confidence":75},"description":"Long cigar-shaped gray-green lesions on corn leaves.","recommendations":{"nonChemical":["Rotate crops","Till residue","Plant resistant hybrids"],"chemical":["Apply a strobilurin at VT","Scout before spraying","Follow label rates"]}}"#;

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            configured: true,
        }
    }

    /// A client with no credential: every call fails before "reaching" the
    /// provider and is not counted.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    pub fn with_provider_error(self, status: u16) -> Self {
        self.push(MockReply::ProviderStatus(status));
        self
    }

    pub fn with_malformed_envelope(self) -> Self {
        self.push(MockReply::MalformedEnvelope);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prompts received so far, oldest first.
    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reply);
    }
}

impl Default for MockInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceService for MockInferenceClient {
    async fn generate(&self, prompt: &str, _image: &ImagePayload) -> Result<String> {
        if !self.configured {
            return Err(Error::Configuration("GEMINI_API_KEY not set".to_string()));
        }

        let count = {
            let mut count = self.call_count.lock().unwrap_or_else(PoisonError::into_inner);
            *count += 1;
            *count
        };
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let reply = {
            let replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
            if replies.is_empty() {
                MockReply::Text(DEFAULT_MOCK_REPLY.to_string())
            } else {
                replies[(count - 1) % replies.len()].clone()
            }
        };

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::ProviderStatus(status) => Err(Error::Provider {
                status: Some(status),
                message: format!("mock provider returned {}", status),
            }),
            MockReply::MalformedEnvelope => Err(Error::MalformedEnvelope(
                "mock envelope without candidates".to_string(),
            )),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImagePayload {
        ImagePayload {
            declared_mime: None,
            data: "AAAA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_default_reply_is_valid_json() {
        let client = MockInferenceClient::new();
        let text = client.generate("p", &image()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value["identification"]["commonName"],
            "Northern Corn Leaf Blight"
        );
    }

    #[tokio::test]
    async fn test_mock_replies_cycle() {
        let client = MockInferenceClient::new()
            .with_text_response("one")
            .with_provider_error(502);

        assert_eq!(client.generate("p", &image()).await.unwrap(), "one");
        assert!(matches!(
            client.generate("p", &image()).await.unwrap_err(),
            Error::Provider {
                status: Some(502),
                ..
            }
        ));
        assert_eq!(client.generate("p", &image()).await.unwrap(), "one");
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_unconfigured_mock_is_not_counted() {
        let client = MockInferenceClient::unconfigured();
        assert!(!client.is_configured());

        let err = client.generate("p", &image()).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(client.get_call_count(), 0);
        assert!(client.received_prompts().is_empty());
    }
}
