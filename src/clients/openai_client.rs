use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::send_json;
use crate::service::completion_provider::{CompletionError, CompletionProvider, Sampling};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    sampling: Sampling,
}

impl OpenAIProvider {
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

    fn build_request<'a>(&'a self, prompt: &'a str) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: &self.sampling.model,
            messages: vec![OpenAIMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.sampling.max_tokens,
            temperature: self.sampling.temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt));

        let parsed: OpenAIResponse = send_json(request).await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default())
    }
}
