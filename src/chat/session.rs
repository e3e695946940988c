use crate::{
    Result,
    config::LlmConfig,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient, OpenAiClient},
};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A single conversation shared by every caller of the chat endpoint.
///
/// Each user turn is sent as the system prompt followed by the user's text,
/// and the whole history is replayed to the model on every turn. The history
/// lock is held across the model call so turns never interleave.
pub struct ChatSession {
    llm_client: Box<dyn LlmClient>,
    system_prompt: String,
    temperature: Option<f32>,
    history: Mutex<Vec<ChatMessage>>,
}

impl ChatSession {
    pub fn new(llm_config: LlmConfig) -> Self {
        let system_prompt = llm_config.system_prompt().to_string();
        let temperature = llm_config.temperature;
        let client = OpenAiClient::new(llm_config);
        info!("Starting chat session with model: {}", client.model());
        Self::with_client(Box::new(client), system_prompt, temperature)
    }

    pub fn with_client(
        llm_client: Box<dyn LlmClient>,
        system_prompt: impl Into<String>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            llm_client,
            system_prompt: system_prompt.into(),
            temperature,
            history: Mutex::new(Vec::new()),
        }
    }

    pub async fn send_message(&self, text: &str) -> Result<String> {
        let mut history = self.history.lock().await;

        history.push(ChatMessage::user(format!(
            "{}\n\nUser: {}",
            self.system_prompt, text
        )));

        let request = ChatCompletionRequest {
            messages: history.clone(),
            temperature: self.temperature,
        };

        match self.llm_client.create_chat_completion(request).await {
            Ok(response) => {
                debug!(
                    "Chat completion {} finished: {:?}",
                    response.id, response.finish_reason
                );
                let reply = response.message.content.clone();
                history.push(response.message);
                Ok(reply)
            }
            Err(e) => {
                // The turn never happened as far as the model is concerned.
                history.pop();
                Err(e)
            }
        }
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }

    pub async fn reset(&self) {
        self.history.lock().await.clear();
    }
}
