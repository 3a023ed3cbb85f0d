use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::relay::types::OutboundMessage;
use crate::relay::{AgentBackend, RelayError};

/// HTTP client for the conversational agent service.
#[derive(Debug, Clone)]
pub struct AgentServiceClient {
    client: Client,
}

impl AgentServiceClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn build_form(message: OutboundMessage) -> Result<Form, RelayError> {
        let mut form = Form::new()
            .text("roomId", message.room_id)
            .text("userId", message.user_id)
            .text("userName", message.user_name)
            .text("name", message.name)
            .text("text", message.text);

        if let Some(attachment) = message.attachment {
            let mut part = Part::bytes(attachment.data.to_vec()).file_name("file");
            if let Some(content_type) = attachment.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            form = form.part("file", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl AgentBackend for AgentServiceClient {
    async fn post_message(&self, url: &str, message: OutboundMessage) -> Result<Value, RelayError> {
        let form = Self::build_form(message)?;
        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await?;
            warn!("Agent service returned {}: {}", status, error);
            return Err(RelayError::Downstream(error));
        }

        let text = response.text().await?;
        debug!("Agent service replied with {} bytes", text.len());
        serde_json::from_str(&text).map_err(|e| RelayError::unexpected(e))
    }
}
