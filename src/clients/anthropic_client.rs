use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::send_json;
use crate::service::completion_provider::{CompletionError, CompletionProvider, Sampling};

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    sampling: Sampling,
}

impl AnthropicProvider {
    pub fn new(api_key: String, sampling: Sampling) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            sampling,
        }
    }

    pub fn with_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = AnthropicRequest {
            model: &self.sampling.model,
            max_tokens: self.sampling.max_tokens,
            temperature: self.sampling.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };
        let request = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body);

        let parsed: AnthropicResponse = send_json(request).await?;
        Ok(parsed
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}
