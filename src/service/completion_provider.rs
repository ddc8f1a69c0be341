use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::clients::anthropic_client::AnthropicProvider;
use crate::clients::openai_client::OpenAIProvider;
use crate::config::{ProviderKind, ProviderSettings};

/// Anything that went wrong talking to the completion API.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse JSON: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

/// Fixed sampling parameters sent with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&ProviderSettings> for Sampling {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the raw completion text, possibly empty.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

pub fn build_provider(settings: &ProviderSettings) -> Arc<dyn CompletionProvider> {
    let sampling = Sampling::from(settings);
    match settings.kind {
        ProviderKind::OpenAI => {
            let provider = OpenAIProvider::new(settings.api_key.clone(), sampling);
            Arc::new(match &settings.api_url {
                Some(url) => provider.with_url(url.clone()),
                None => provider,
            })
        }
        ProviderKind::Anthropic => {
            let provider = AnthropicProvider::new(settings.api_key.clone(), sampling);
            Arc::new(match &settings.api_url {
                Some(url) => provider.with_url(url.clone()),
                None => provider,
            })
        }
    }
}
