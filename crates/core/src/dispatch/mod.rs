//! Request dispatcher.
//!
//! Packages combined pseudocode, model selection, and target language into a
//! single chat-completion request and normalizes the outcome. The network
//! seam is the [`ChatEndpoint`] trait so the routing and validation logic is
//! testable without a live service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TranslationRequest;

/// Default chat-completion endpoint (Azure AI model inference).
pub const DEFAULT_ENDPOINT_URL: &str = "https://models.inference.ai.azure.com/chat/completions";

// Fixed generation parameters: deterministic output, enough room for a
// multi-function translation.
const TEMPERATURE: f32 = 0.0;
const MAX_TOKENS: u32 = 2048;
const TOP_P: f32 = 1.0;

const LANGUAGE_PLACEHOLDER: &str = "[target_language]";

const SYSTEM_PROMPT: &str = "\
Act as an expert reverse engineer and code translator. Your task is to convert decompiled \
pseudocode into clean, modern, readable [target_language] code.

Key requirements:
1. You will receive pseudocode with MULTIPLE FUNCTIONS. The MAIN function is at the TOP, and \
HELPER functions are BELOW, each introduced by a '// Function:' marker.
2. You MUST identify each helper call in the main function and REPLACE it with a call to your \
translated helper function.
3. Create meaningful names for the helper functions based on their behavior.
4. Your final code MUST contain implementations for ALL helper functions AND properly CALL them \
from the main function.
5. Improve readability by using descriptive names and modern syntax.
6. Replace low-level pointer operations with safer alternatives appropriate for \
[target_language].

Your output must be ONLY the translated code with no markdown, explanations, or comments around \
it.";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("API key is required")]
    MissingCredential,
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),
    #[error("Error processing request: {0}")]
    Transport(String),
    #[error("Translation service returned no choices")]
    EmptyResponse,
}

/// One message in a chat-completion conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Wire request for the chat-completion service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// Wire response; only the first choice's content is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessageBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageBody {
    #[serde(default)]
    pub content: String,
}

/// Network seam for the dispatcher.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    async fn complete(
        &self,
        request: &ChatRequest,
        api_key: &str,
    ) -> Result<ChatResponse, DispatchError>;
}

/// Production endpoint: POSTs the request as JSON with a bearer credential.
pub struct HttpChatEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpChatEndpoint {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_ENDPOINT_URL)
    }

    /// Point the endpoint at a different URL (tests, self-hosted gateways).
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), url: url.into() }
    }
}

impl Default for HttpChatEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatEndpoint for HttpChatEndpoint {
    async fn complete(
        &self,
        request: &ChatRequest,
        api_key: &str,
    ) -> Result<ChatResponse, DispatchError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        response.json().await.map_err(|e| DispatchError::Transport(e.to_string()))
    }
}

/// Issues the single outbound translation request and normalizes its outcome.
pub struct Dispatcher {
    endpoint: Arc<dyn ChatEndpoint>,
}

impl Dispatcher {
    /// Dispatcher over the production HTTP endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(Arc::new(HttpChatEndpoint::new()))
    }

    pub fn with_endpoint(endpoint: Arc<dyn ChatEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Translate `request.pseudocode` into `request.target_language`.
    ///
    /// Validation happens before any network interaction: an empty credential
    /// and an unrecognized model both fail without touching the endpoint.
    /// Routing recognizes the DeepSeek family by case-insensitive prefix.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<String, DispatchError> {
        if request.api_key.is_empty() {
            return Err(DispatchError::MissingCredential);
        }
        if !request.model.to_ascii_lowercase().starts_with("deepseek") {
            return Err(DispatchError::UnsupportedModel(request.model.clone()));
        }

        let wire = ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(build_system_prompt(&request.target_language)),
                ChatMessage::user(build_user_prompt(&request.pseudocode, &request.target_language)),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
        };

        log::debug!(
            "dispatching translation request: model={} language={}",
            request.model,
            request.target_language
        );
        let response = self.endpoint.complete(&wire, &request.api_key).await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(DispatchError::EmptyResponse)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn build_system_prompt(target_language: &str) -> String {
    SYSTEM_PROMPT.replace(LANGUAGE_PLACEHOLDER, target_language)
}

fn build_user_prompt(pseudocode: &str, target_language: &str) -> String {
    format!(
        "Translate this decompiled pseudocode to clean, modern {target_language} code. Return \
         ONLY the translated code without any markdown formatting, explanations, or comments. Do \
         NOT use code blocks with backticks. Just output the raw code directly:\n\n{pseudocode}"
    )
}
