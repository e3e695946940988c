use async_trait::async_trait;
use dermassist::{
    Error, Result,
    classifier::{Classifier, PreparedImage},
    llm::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, LlmClient},
};
use std::sync::{Arc, Mutex};

/// Mock LLM client; clones share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    pub replies: Arc<Mutex<Vec<String>>>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    pub error: Option<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(self, replies: &[&str]) -> Self {
        *self.replies.lock().unwrap() = replies.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(Error::llm("No more mock replies available"));
        }

        Ok(ChatCompletionResponse {
            id: "chatcmpl-mock".to_string(),
            model: "mock-model".to_string(),
            message: ChatMessage::assistant(replies.remove(0)),
            finish_reason: Some("Stop".to_string()),
            usage: None,
        })
    }
}

/// Classifier that ignores its input and returns fixed scores.
pub struct FixedClassifier {
    pub size: u32,
    pub scores: Vec<f32>,
}

impl Classifier for FixedClassifier {
    fn input_size(&self) -> u32 {
        self.size
    }

    fn predict(&self, image: &PreparedImage) -> Result<Vec<f32>> {
        assert_eq!(image.pixels.len(), (self.size * self.size * 3) as usize);
        Ok(self.scores.clone())
    }
}
