//! Ollama chat API client
//!
//! One blocking suspension point per loop iteration: the orchestrator sends
//! the whole conversation and receives a single assistant message back.
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::config::{AgentConfig, MODEL_TEMPERATURE};
use crate::error::AgentError;
use crate::models::ChatMessage;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Abstraction over the model service so the orchestrator can be exercised
/// with a scripted model in tests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the conversation so far, receive one assistant message's text.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Reusable Ollama client (connection-pooled)
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OllamaClient {
    pub fn new(config: &AgentConfig) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        // Cloud: https://ollama.com/api/chat - local: http://localhost:11434/api/chat
        let endpoint = format!("{}/api/chat", config.ollama_url.trim_end_matches('/'));

        Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: MODEL_TEMPERATURE,
            },
        };

        debug!(model = %self.model, message_count = messages.len(), "Calling Ollama chat API");

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            error!("Ollama request failed: {}", e);
            AgentError::Model(format!("Ollama API error: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Ollama error response: {}", error_text);
            return Err(AgentError::Model(format!(
                "Ollama API HTTP error: {} - {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Ollama response: {}", e);
            AgentError::Model(format!("Ollama API returned invalid JSON: {}", e))
        })?;

        Ok(chat_response.message.content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
