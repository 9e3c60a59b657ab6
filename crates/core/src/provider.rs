use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key for {provider_name}: set {env_var} or write it to {}", .key_file.display())]
    MissingApiKey {
        provider_name: String,
        env_var: String,
        key_file: PathBuf,
    },

    #[error("Failed to read API key file {}: {source}", .path.display())]
    KeyFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Openai,
    Grok,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-3.5-turbo",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-2.5-flash",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Openai => "OpenAI",
            Provider::Grok => "Grok",
            Provider::Gemini => "Gemini",
        }
    }

    /// Resolve the API key: the provider's environment variable first, then
    /// the first non-empty contents of `key_file`.
    pub fn resolve_api_key(&self, key_file: &Path) -> Result<String, ProviderError> {
        let config = self.config();
        if let Some(key) = std::env::var(config.env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
        {
            return Ok(key.trim().to_string());
        }
        self.read_key_file(key_file)
    }

    fn read_key_file(&self, key_file: &Path) -> Result<String, ProviderError> {
        let missing = || ProviderError::MissingApiKey {
            provider_name: self.name().to_string(),
            env_var: self.config().env_var.to_string(),
            key_file: key_file.to_path_buf(),
        };

        match std::fs::read_to_string(key_file) {
            Ok(contents) => {
                let key = contents.trim();
                if key.is_empty() {
                    Err(missing())
                } else {
                    Ok(key.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(missing()),
            Err(source) => Err(ProviderError::KeyFileUnreadable {
                path: key_file.to_path_buf(),
                source,
            }),
        }
    }
}
