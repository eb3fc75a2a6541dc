use crate::{errors::PromptError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

/// Sampling temperature for every research request.
pub const GATEWAY_TEMPERATURE: f32 = 0.7;
/// Completion budget for every research request.
pub const GATEWAY_MAX_TOKENS: u32 = 2000;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

// --- Gateway Provider implementation ---

/// A provider for the hosted, OpenAI-compatible AI gateway.
///
/// One bearer-authenticated chat-completion call per request; no streaming,
/// no retries.
#[derive(Clone, Debug)]
pub struct GatewayProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl GatewayProvider {
    /// Creates a new `GatewayProvider`.
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for GatewayProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: GATEWAY_TEMPERATURE,
            max_tokens: GATEWAY_MAX_TOKENS,
            stream: false,
        };
        debug!(model = %self.model, "Calling AI gateway");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi(format!("{status}: {error_text}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(PromptError::AiDeserialization)?;

        let raw_response = completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(raw_response)
    }
}
