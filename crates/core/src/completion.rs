use async_trait::async_trait;
use reqwest::StatusCode;

use crate::provider::Provider;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion service rejected the API key ({status})")]
    Unauthorized { status: StatusCode },

    #[error("Completion service rate limit reached; please try again in a minute")]
    RateLimited,

    #[error("Completion service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    InvalidResponse(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

/// A text-completion backend. Implementations own their model and credential.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct ChatCompletionClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(provider: &Provider, api_key: String) -> Self {
        let config = provider.config();
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.to_string(),
            model: config.model.to_string(),
            api_key,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let response = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": request.system,
                    },
                    {
                        "role": "user",
                        "content": request.user,
                    },
                ],
            }))
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CompletionError::Unauthorized { status });
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(CompletionError::RateLimited),
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(CompletionError::Status { status, body });
            }
            _ => {}
        }

        let response = response.json::<serde_json::Value>().await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string);

        content.ok_or(CompletionError::InvalidResponse(response))
    }
}
