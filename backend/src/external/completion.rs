//! Chat-completion client
//!
//! Works with any OpenAI-compatible `/chat/completions` endpoint (Groq by
//! default). Image attachments travel as `image_url` content parts holding a
//! base64 data URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{AdvisoryResult, PromptSpec};

use crate::config::CompletionConfig;
use crate::error::{AppError, AppResult};

/// Longest provider error body echoed back to the client
const MAX_ERROR_DETAIL: usize = 300;

/// Model and sampling settings for one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

/// Text/vision completion backend
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run one completion; failures are never replaced by defaults
    async fn complete(
        &self,
        prompt: &PromptSpec,
        options: &CompletionOptions,
    ) -> AppResult<AdvisoryResult>;
}

/// OpenAI-compatible completion client
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// `{"error": {"message": ...}}` as returned by OpenAI-style providers
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

impl ChatCompletionClient {
    /// Create a new completion client
    pub fn new(client: Client, config: &CompletionConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Wire request for a prompt
    pub fn build_request<'a>(
        prompt: &'a PromptSpec,
        options: &'a CompletionOptions,
    ) -> ChatRequest<'a> {
        let user_content = if prompt.attachments().is_empty() {
            MessageContent::Text(prompt.user_message())
        } else {
            let mut parts = Vec::with_capacity(prompt.attachments().len() + 1);
            if !prompt.user_message().is_empty() {
                parts.push(ContentPart::Text {
                    text: prompt.user_message(),
                });
            }
            parts.extend(prompt.attachments().iter().map(|a| ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: a.to_data_url(),
                },
            }));
            MessageContent::Parts(parts)
        };

        ChatRequest {
            model: &options.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(prompt.system_instruction()),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    /// Connection failures and timeouts carry no provider status
    fn transport_failure(e: reqwest::Error) -> AppError {
        AppError::UpstreamCompletion {
            status: None,
            message: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                format!("Request failed: {}", e)
            },
        }
    }

    /// Pull the provider's own message out of an error body
    fn error_detail(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ProviderErrorBody>(body) {
            return parsed.error.message;
        }
        let body = body.trim();
        if body.is_empty() {
            return "no response body".to_string();
        }
        body.chars().take(MAX_ERROR_DETAIL).collect()
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    async fn complete(
        &self,
        prompt: &PromptSpec,
        options: &CompletionOptions,
    ) -> AppResult<AdvisoryResult> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = Self::build_request(prompt, options);

        tracing::debug!(model = %options.model, attachments = prompt.attachments().len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Self::transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Completion provider returned error");
            return Err(AppError::UpstreamCompletion {
                status: Some(status.as_u16()),
                message: Self::error_detail(&body),
            });
        }

        let data: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Self::transport_failure(e)
            } else {
                AppError::UpstreamCompletion {
                    status: Some(status.as_u16()),
                    message: format!("Failed to parse response: {}", e),
                }
            }
        })?;

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::UpstreamCompletion {
                status: Some(status.as_u16()),
                message: "No completion choices in response".to_string(),
            })?;

        Ok(AdvisoryResult::from_completion(&content, options.model.as_str()))
    }
}
