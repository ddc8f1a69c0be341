pub mod anthropic_client;
pub mod openai_client;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::service::completion_provider::CompletionError;

/// Sends a prepared request, reads the body once, and decodes it.
async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, CompletionError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(CompletionError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    debug!(bytes = text.len(), "completion response received");
    serde_json::from_str(&text).map_err(|source| CompletionError::Malformed { source, body: text })
}
