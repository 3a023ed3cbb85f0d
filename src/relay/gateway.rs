use tracing::{debug, info};

use super::backend::AgentBackend;
use super::error::RelayError;
use super::types::{OutboundMessage, RelayRequest, RelayResponse};

/// Forwards inbound messages to the configured agent service.
///
/// Holds no per-call state; one instance serves concurrent requests.
pub struct RelayGateway<B> {
    base_url: Option<String>,
    backend: B,
}

impl<B: AgentBackend> RelayGateway<B> {
    pub fn new(base_url: Option<String>, backend: B) -> Self {
        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Self { base_url, backend }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Base URL of the agent service, or a configuration error.
    pub fn ensure_configured(&self) -> Result<&str, RelayError> {
        self.base_url.as_deref().ok_or(RelayError::Configuration)
    }

    pub fn message_url(base_url: &str, agent_id: &str) -> String {
        format!("{}/{}/message", base_url, agent_id)
    }

    /// Relay one request. Makes at most one outbound call.
    pub async fn forward(&self, request: RelayRequest) -> Result<RelayResponse, RelayError> {
        let base_url = self.ensure_configured()?;

        if !request.has_text() {
            debug!(
                "No text for transcript {}, skipping agent {}",
                request.target.transcript_id, request.target.agent_id
            );
            return Ok(RelayResponse::Empty);
        }

        let url = Self::message_url(base_url, &request.target.agent_id);
        let message = OutboundMessage::from_request(&request);
        info!(
            "Forwarding transcript {} to {} (attachment: {})",
            request.target.transcript_id,
            url,
            message.attachment.is_some()
        );

        let body = self.backend.post_message(&url, message).await?;
        Ok(RelayResponse::Agent(body))
    }
}
