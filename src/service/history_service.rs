use std::sync::Arc;

use tracing::{debug, info};

use crate::models::date_context::DateContext;
use crate::service::completion_provider::{CompletionError, CompletionProvider};
use crate::service::prompt::history_prompt;

/// Substituted when the provider answers with no usable text.
pub const NO_HISTORY_FALLBACK: &str = "No history available today.";

pub struct HistoryService {
    provider: Arc<dyn CompletionProvider>,
}

impl HistoryService {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn fetch_events(&self, date: &DateContext) -> Result<String, CompletionError> {
        let prompt = history_prompt(date);
        debug!(provider = self.provider.name(), %prompt, "requesting history");

        let text = self.provider.complete(&prompt).await?;
        let text = text.trim();
        if text.is_empty() {
            info!(provider = self.provider.name(), "empty completion, using fallback text");
            return Ok(NO_HISTORY_FALLBACK.to_string());
        }
        Ok(text.to_string())
    }
}
