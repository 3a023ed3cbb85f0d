use async_trait::async_trait;
use serde_json::Value;

use super::error::RelayError;
use super::types::OutboundMessage;

/// Transport to the conversational agent service.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// POST `message` to `url` and return the parsed JSON body.
    ///
    /// Non-success statuses must come back as [`RelayError::Downstream`]
    /// carrying the response text.
    async fn post_message(&self, url: &str, message: OutboundMessage) -> Result<Value, RelayError>;
}
